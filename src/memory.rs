use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub trait Bus {
    fn read_u8(&mut self, addr: u64) -> Result<u8>;
    fn read_u16(&mut self, addr: u64) -> Result<u16>;
    fn read_u32(&mut self, addr: u64) -> Result<u32>;
    fn read_u64(&mut self, addr: u64) -> Result<u64>;
    fn write_u8(&mut self, addr: u64, val: u8) -> Result<()>;
    fn write_u16(&mut self, addr: u64, val: u16) -> Result<()>;
    fn write_u32(&mut self, addr: u64, val: u32) -> Result<()>;
    fn write_u64(&mut self, addr: u64, val: u64) -> Result<()>;
}

/// Flat little-endian byte buffer mapped at `base`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
    pub base: u64,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size],
            base: 0,
        }
    }

    fn range(&self, addr: u64, len: usize) -> Result<std::ops::Range<usize>> {
        let off = addr
            .checked_sub(self.base)
            .and_then(|o| usize::try_from(o).ok())
            .ok_or_else(|| anyhow!("address {addr:#x} below memory base {:#x}", self.base))?;
        match off.checked_add(len) {
            Some(end) if end <= self.mem.len() => Ok(off..end),
            _ => Err(anyhow!(
                "{len}-byte access at {addr:#x} outside {} bytes of memory",
                self.mem.len()
            )),
        }
    }

    fn load<const N: usize>(&self, addr: u64) -> Result<[u8; N]> {
        let r = self.range(addr, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.mem[r]);
        Ok(out)
    }

    fn store(&mut self, addr: u64, bytes: &[u8]) -> Result<()> {
        let r = self.range(addr, bytes.len())?;
        self.mem[r].copy_from_slice(bytes);
        Ok(())
    }
}

impl std::fmt::Debug for LinearMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearMemory")
            .field("base", &self.base)
            .field("len", &self.mem.len())
            .finish()
    }
}

impl Bus for LinearMemory {
    fn read_u8(&mut self, addr: u64) -> Result<u8> {
        Ok(self.load::<1>(addr)?[0])
    }
    fn read_u16(&mut self, addr: u64) -> Result<u16> {
        Ok(u16::from_le_bytes(self.load(addr)?))
    }
    fn read_u32(&mut self, addr: u64) -> Result<u32> {
        Ok(u32::from_le_bytes(self.load(addr)?))
    }
    fn read_u64(&mut self, addr: u64) -> Result<u64> {
        Ok(u64::from_le_bytes(self.load(addr)?))
    }
    fn write_u8(&mut self, addr: u64, val: u8) -> Result<()> {
        self.store(addr, &[val])
    }
    fn write_u16(&mut self, addr: u64, val: u16) -> Result<()> {
        self.store(addr, &val.to_le_bytes())
    }
    fn write_u32(&mut self, addr: u64, val: u32) -> Result<()> {
        self.store(addr, &val.to_le_bytes())
    }
    fn write_u64(&mut self, addr: u64, val: u64) -> Result<()> {
        self.store(addr, &val.to_le_bytes())
    }
}
