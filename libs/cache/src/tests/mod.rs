use anyhow::bail;

pub(crate) mod mem;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Key(pub u64);

impl Key {
    pub fn generate(&self) -> anyhow::Result<u64> {
        if self.0 == 5 {
            bail!("invalid key");
        }
        Ok(self.0 * 10)
    }
}
