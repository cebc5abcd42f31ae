/// ADD-family encoding classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Immediate,
    ShiftedRegister,
    ExtendedRegister,
    Vector,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub form: Form,
    pub mnemonic: &'static str,
    /// Reference manual section.
    pub section: &'static str,
    /// Bits fixed by the encoding, and their required values.
    pub mask: u32,
    pub pattern: u32,
}

impl InstrDesc {
    pub fn matches(&self, raw: u32) -> bool {
        raw & self.mask == self.pattern
    }
}

pub const TABLE: &[InstrDesc] = &[
    InstrDesc {
        form: Form::Immediate,
        mnemonic: "add",
        section: "C6.2.5",
        mask: 0x7F80_0000,
        pattern: 0x1100_0000,
    },
    InstrDesc {
        form: Form::ShiftedRegister,
        mnemonic: "add",
        section: "C6.2.6",
        mask: 0x7F20_0000,
        pattern: 0x0B00_0000,
    },
    InstrDesc {
        form: Form::ExtendedRegister,
        mnemonic: "add",
        section: "C6.2.4",
        mask: 0x7FE0_0000,
        pattern: 0x0B20_0000,
    },
    InstrDesc {
        form: Form::Vector,
        mnemonic: "add",
        section: "C7.2.2",
        mask: 0xBF20_FC00,
        pattern: 0x0E20_8400,
    },
];

pub fn lookup(raw: u32) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.matches(raw))
}
