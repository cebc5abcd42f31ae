use std::fmt;

use anyhow::Error;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::decoder::Decoder;
use crate::memory::{Bus, LinearMemory};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MachineConfig {
    pub memory_size: usize,
    pub reset_pc: u64,
    pub reset_sp: u64,
    /// Clear bits 64..128 of the destination on a 64-bit (`Q=0`) vector op.
    pub zero_upper_on_q0: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: 1024 * 1024,
            reset_pc: 0,
            reset_sp: 0,
            zero_upper_on_q0: true,
        }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpsr: u32 {
const V = 1 << 28; // Overflow
const C = 1 << 29; // Carry
const Z = 1 << 30; // Zero
const N = 1 << 31; // Negative
}
}

/// One 128-bit SIMD register, stored little-endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VReg(pub [u8; 16]);

impl VReg {
    /// Value of lane `lane` of width `esize` bits (8, 16, 32 or 64).
    pub fn lane(&self, lane: usize, esize: usize) -> u64 {
        let bytes = esize / 8;
        let off = lane * bytes;
        let mut buf = [0u8; 8];
        buf[..bytes].copy_from_slice(&self.0[off..off + bytes]);
        u64::from_le_bytes(buf)
    }

    /// Store the low `esize` bits of `val` into lane `lane`.
    pub fn set_lane(&mut self, lane: usize, esize: usize, val: u64) {
        let bytes = esize / 8;
        let off = lane * bytes;
        self.0[off..off + bytes].copy_from_slice(&val.to_le_bytes()[..bytes]);
    }

    pub fn from_lanes(esize: usize, lanes: &[u64]) -> Self {
        let mut v = VReg::default();
        for (i, &val) in lanes.iter().enumerate() {
            v.set_lane(i, esize, val);
        }
        v
    }

    pub fn lanes(&self, esize: usize) -> Vec<u64> {
        (0..128 / esize).map(|i| self.lane(i, esize)).collect()
    }

    pub fn low(&self) -> u64 {
        self.lane(0, 64)
    }

    pub fn high(&self) -> u64 {
        self.lane(1, 64)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("Invalid instruction {raw:#010x} at {pc:#x}")]
    InvalidInstruction { pc: u64, raw: u32 },
    #[error("Bus error at {addr:#x}: {source}")]
    Bus { addr: u64, #[source] source: Error },
}

/// Architectural state of one A64 core plus its memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// x0..x30. Index 31 is never stored here.
    pub r: [u64; 31],
    pub v: [VReg; 32],
    pub sp: u64,
    pub pc: u64,
    pub cpsr: Cpsr,
    #[serde(skip)]
    pub mem: LinearMemory,
    pub cfg: MachineConfig,
}

impl Machine {
    pub fn new(cfg: MachineConfig) -> Self {
        Self {
            r: [0; 31],
            v: [VReg::default(); 32],
            sp: cfg.reset_sp,
            pc: cfg.reset_pc,
            cpsr: Cpsr::empty(),
            mem: LinearMemory::new(cfg.memory_size),
            cfg,
        }
    }

    /// Read `n`, treating 31 as the stack pointer.
    pub fn reg_or_sp(&self, n: u8) -> u64 {
        match n & 0x1F {
            31 => self.sp,
            n => self.r[n as usize],
        }
    }

    /// Write `n`, treating 31 as the stack pointer.
    pub fn set_reg_or_sp(&mut self, n: u8, val: u64) {
        trace!(reg = n, val, "write");
        match n & 0x1F {
            31 => self.sp = val,
            n => self.r[n as usize] = val,
        }
    }

    /// Read `n`, treating 31 as the zero register.
    pub fn reg_or_zero(&self, n: u8) -> u64 {
        match n & 0x1F {
            31 => 0,
            n => self.r[n as usize],
        }
    }

    /// Store instruction words little-endian starting at `addr`.
    pub fn load_program(&mut self, addr: u64, words: &[u32]) -> anyhow::Result<()> {
        for (i, &word) in words.iter().enumerate() {
            self.mem.write_u32(addr + 4 * i as u64, word)?;
        }
        Ok(())
    }

    pub fn step<D: Decoder>(&mut self, dec: &D) -> Result<(), Trap> {
        let pc = self.pc;
        let raw = self
            .mem
            .read_u32(pc)
            .map_err(|source| Trap::Bus { addr: pc, source })?;
        let op = dec.decode(raw).ok_or(Trap::InvalidInstruction { pc, raw })?;
        debug!(pc, raw, %op, "step");
        self.pc = pc.wrapping_add(4);
        op.execute(self);
        Ok(())
    }

    /// Step until `pc == end` or `max_steps` instructions have run.
    /// Returns the number of instructions executed.
    pub fn run_until<D: Decoder>(&mut self, dec: &D, end: u64, max_steps: u64) -> Result<u64, Trap> {
        let mut steps = 0;
        while self.pc != end && steps < max_steps {
            self.step(dec)?;
            steps += 1;
        }
        Ok(steps)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.r.iter().enumerate() {
            writeln!(f, "x{i}: {r:#x}")?;
        }
        writeln!(f, "PC: {:#x}", self.pc)?;
        writeln!(f, "SP: {:#x}", self.sp)?;
        writeln!(f, "CPSR: {:#x}", self.cpsr.bits())
    }
}
