//! Closed set of 65C02 mnemonics and assembler pseudo-ops
//!
//! A first token outside this set is a label.

const MNEMONICS: &[&str] = &[
    "ADC", "AND", "ASL", "BCC", "BCS", "BEQ", "BIT", "BMI", "BNE", "BPL", "BRA", "BRK", "BVC",
    "BVS", "CLC", "CLD", "CLI", "CLV", "CMP", "CPX", "CPY", "DEA", "DEC", "DEX", "DEY", "DSK",
    "EOR", "EQU", "INA", "INC", "INX", "INY", "JMP", "JSR", "LDA", "LDX", "LDY", "LSR", "MX",
    "NOP", "ORA", "ORG", "PHA", "PHP", "PHX", "PHY", "PLA", "PLP", "PLX", "PLY", "ROL", "ROR",
    "RTI", "RTS", "SBC", "SEC", "SED", "SEI", "STA", "STX", "STY", "STZ", "TAX", "TAY", "TRB",
    "TSB", "TSX", "TXA", "TXS", "TYA",
];

#[must_use]
pub fn is_mnemonic(token: &str) -> bool {
    MNEMONICS.contains(&token)
}
