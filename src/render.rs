//! Human-readable rendering of resolved types
//!
//! Renders a [`Type`] tree losslessly in spoken-declaration order, e.g.
//! `int (*(*pf)(double d))[3];` displays as
//! `pointer to function (double d) returning pointer to array[3] of int`.

use std::fmt;

use crate::parser::types::{ArrayLen, Param, Type};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Bool => f.write_str("bool"),
            Type::Char => f.write_str("char"),
            Type::Short => f.write_str("short"),
            Type::Int => f.write_str("int"),
            Type::Long => f.write_str("long"),
            Type::UChar => f.write_str("unsigned char"),
            Type::UShort => f.write_str("unsigned short"),
            Type::UInt => f.write_str("unsigned int"),
            Type::ULong => f.write_str("unsigned long"),
            Type::Float => f.write_str("float"),
            Type::Double => f.write_str("double"),
            Type::I8 => f.write_str("int8_t"),
            Type::I16 => f.write_str("int16_t"),
            Type::I32 => f.write_str("int32_t"),
            Type::I64 => f.write_str("int64_t"),
            Type::U8 => f.write_str("uint8_t"),
            Type::U16 => f.write_str("uint16_t"),
            Type::U32 => f.write_str("uint32_t"),
            Type::U64 => f.write_str("uint64_t"),
            Type::Size => f.write_str("size_t"),
            Type::SSize => f.write_str("ssize_t"),
            Type::Pointer(base) => write!(f, "pointer to {}", base),
            Type::Array { base, len } => {
                match len {
                    ArrayLen::Unspecified => write!(f, "array[]")?,
                    ArrayLen::Literal(n) => write!(f, "array[{}]", n)?,
                    ArrayLen::Named(name) => write!(f, "array[{}]", name)?,
                }
                write!(f, " of {}", base)
            }
            Type::Function { ret, params } => {
                f.write_str("function (")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") returning {}", ret)
            }
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", self.ty, name),
            None => write!(f, "{}", self.ty),
        }
    }
}
