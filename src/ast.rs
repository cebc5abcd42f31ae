use serde::{Deserialize, Serialize};

/// Width class implied by a general register's name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegWidth {
    /// `w` registers, 32-bit operation.
    W,
    /// `x` registers and `sp`, 64-bit operation.
    X,
}

impl RegWidth {
    pub fn datasize(self) -> u32 {
        match self {
            RegWidth::W => 32,
            RegWidth::X => 64,
        }
    }

    pub fn sf(self) -> u8 {
        match self {
            RegWidth::W => 0,
            RegWidth::X => 1,
        }
    }

    pub fn from_sf(sf: u8) -> Self {
        if sf & 1 == 1 {
            RegWidth::X
        } else {
            RegWidth::W
        }
    }

    pub fn prefix(self) -> char {
        match self {
            RegWidth::W => 'w',
            RegWidth::X => 'x',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpReg {
    pub index: u8,
    pub width: RegWidth,
    /// Written as `sp` rather than a numbered register.
    pub sp: bool,
}

impl GpReg {
    pub fn x(index: u8) -> Self {
        Self { index, width: RegWidth::X, sp: false }
    }

    pub fn w(index: u8) -> Self {
        Self { index, width: RegWidth::W, sp: false }
    }

    pub fn sp() -> Self {
        Self { index: 31, width: RegWidth::X, sp: true }
    }

    pub fn name(&self) -> String {
        if self.sp {
            "sp".to_string()
        } else {
            format!("{}{}", self.width.prefix(), self.index)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VecReg {
    pub index: u8,
    /// Element-type tag without the dot, lower-cased (`16b`, `4s`, ...).
    pub arrangement: String,
}

impl VecReg {
    pub fn new(index: u8, arrangement: &str) -> Self {
        Self { index, arrangement: arrangement.to_ascii_lowercase() }
    }

    pub fn name(&self) -> String {
        format!("v{}.{}", self.index, self.arrangement)
    }
}

/// Arrangement tag, `Q`, `size` for ADD (vector). `1d` is reserved.
pub const ARRANGEMENTS: &[(&str, u8, u8)] = &[
    ("8b", 0, 0b00),
    ("16b", 1, 0b00),
    ("4h", 0, 0b01),
    ("8h", 1, 0b01),
    ("2s", 0, 0b10),
    ("4s", 1, 0b10),
    ("2d", 1, 0b11),
];

pub fn arrangement_fields(tag: &str) -> Option<(u8, u8)> {
    ARRANGEMENTS
        .iter()
        .find(|(name, _, _)| *name == tag)
        .map(|&(_, q, size)| (q, size))
}

pub fn arrangement_name(q: u8, size: u8) -> Option<&'static str> {
    ARRANGEMENTS
        .iter()
        .find(|&&(_, aq, asize)| aq == q && asize == size)
        .map(|&(name, _, _)| name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
}

impl ShiftKind {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "lsl" => Some(ShiftKind::Lsl),
            "lsr" => Some(ShiftKind::Lsr),
            "asr" => Some(ShiftKind::Asr),
            _ => None,
        }
    }

    /// Value of the 2-bit `shift` field.
    pub fn code(self) -> u8 {
        match self {
            ShiftKind::Lsl => 0b00,
            ShiftKind::Lsr => 0b01,
            ShiftKind::Asr => 0b10,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0b00 => Some(ShiftKind::Lsl),
            0b01 => Some(ShiftKind::Lsr),
            0b10 => Some(ShiftKind::Asr),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShiftKind::Lsl => "lsl",
            ShiftKind::Lsr => "lsr",
            ShiftKind::Asr => "asr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendKind {
    Uxtb,
    Uxth,
    Uxtw,
    Uxtx,
    Sxtb,
    Sxth,
    Sxtw,
    Sxtx,
    /// `lsl` used as an extend: UXTW at 32 bits, UXTX at 64 bits.
    Lsl,
}

impl ExtendKind {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "uxtb" => Some(ExtendKind::Uxtb),
            "uxth" => Some(ExtendKind::Uxth),
            "uxtw" => Some(ExtendKind::Uxtw),
            "uxtx" => Some(ExtendKind::Uxtx),
            "sxtb" => Some(ExtendKind::Sxtb),
            "sxth" => Some(ExtendKind::Sxth),
            "sxtw" => Some(ExtendKind::Sxtw),
            "sxtx" => Some(ExtendKind::Sxtx),
            "lsl" => Some(ExtendKind::Lsl),
            _ => None,
        }
    }

    /// Value of the 3-bit `option` field at the given operation width.
    pub fn option(self, width: RegWidth) -> u8 {
        match self {
            ExtendKind::Uxtb => 0b000,
            ExtendKind::Uxth => 0b001,
            ExtendKind::Uxtw => 0b010,
            ExtendKind::Uxtx => 0b011,
            ExtendKind::Sxtb => 0b100,
            ExtendKind::Sxth => 0b101,
            ExtendKind::Sxtw => 0b110,
            ExtendKind::Sxtx => 0b111,
            ExtendKind::Lsl => match width {
                RegWidth::W => 0b010,
                RegWidth::X => 0b011,
            },
        }
    }

    pub fn from_option(option: u8) -> Self {
        match option & 0b111 {
            0b000 => ExtendKind::Uxtb,
            0b001 => ExtendKind::Uxth,
            0b010 => ExtendKind::Uxtw,
            0b011 => ExtendKind::Uxtx,
            0b100 => ExtendKind::Sxtb,
            0b101 => ExtendKind::Sxth,
            0b110 => ExtendKind::Sxtw,
            _ => ExtendKind::Sxtx,
        }
    }

    /// Width class `Rm` must have for this extend in a 64-bit operation.
    pub fn rm_width(self) -> RegWidth {
        match self {
            ExtendKind::Uxtx | ExtendKind::Sxtx | ExtendKind::Lsl => RegWidth::X,
            _ => RegWidth::W,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExtendKind::Uxtb => "uxtb",
            ExtendKind::Uxth => "uxth",
            ExtendKind::Uxtw => "uxtw",
            ExtendKind::Uxtx => "uxtx",
            ExtendKind::Sxtb => "sxtb",
            ExtendKind::Sxth => "sxth",
            ExtendKind::Sxtw => "sxtw",
            ExtendKind::Sxtx => "sxtx",
            ExtendKind::Lsl => "lsl",
        }
    }
}

/// One parsed ADD instruction, before operand ranges are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    AddImmediate {
        rd: GpReg,
        rn: GpReg,
        /// Literal text without `#` (decimal or `0x` hex).
        imm: String,
        /// Explicit `lsl #n` after the immediate.
        shift: Option<u64>,
    },
    AddShiftedRegister {
        rd: GpReg,
        rn: GpReg,
        rm: GpReg,
        shift: ShiftKind,
        amount: u64,
    },
    AddExtendedRegister {
        rd: GpReg,
        rn: GpReg,
        rm: GpReg,
        extend: ExtendKind,
        amount: u64,
    },
    AddVector {
        vd: VecReg,
        vn: VecReg,
        vm: VecReg,
    },
}

/// An instruction together with the source line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub line: usize,
    pub inst: Instruction,
}
