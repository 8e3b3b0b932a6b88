//! Binding powers for the Pratt expression parser. Each rung is a plain
//! `u8` constant rather than an enum — cheap to compare, and infix
//! parselets can request "one past my own precedence" for right-assoc
//! operators without a match arm.

pub type BindingPower = u8;

pub const NONE: BindingPower = 0;
pub const ASSIGNMENT: BindingPower = 10;
pub const LOGIC_OR: BindingPower = 20;
pub const LOGIC_AND: BindingPower = 30;
pub const BIT_OR: BindingPower = 40;
pub const BIT_XOR: BindingPower = 50;
pub const BIT_AND: BindingPower = 60;
pub const EQUALITY: BindingPower = 70;
pub const COMPARISON: BindingPower = 80;
pub const ADDITIVE: BindingPower = 90;
pub const MULTIPLICATIVE: BindingPower = 100;
pub const POWER: BindingPower = 110;
pub const PREFIX_UNARY: BindingPower = 120;
pub const POSTFIX_UNARY: BindingPower = 130;
pub const CALL: BindingPower = 140;
pub const COMPUTED_MEMBER_ACCESS: BindingPower = 150;
pub const MEMBER_ACCESS: BindingPower = 160;
pub const GROUPING: BindingPower = 170;
pub const MAX: BindingPower = 255;
