//! Type-specifier and declarator resolution
//!
//! This module holds the resolution logic on top of the [`Parser`] cursor:
//!
//! - `declspec`: a run of type-name tokens (or one typedef name) → base type
//! - `declarator`: pointers, parenthesised sub-declarators, identifier, and
//!   array/function suffixes → nested type tree plus declared name
//! - `parse`: the statement driver (`typedef`? declspec declarator,* ;)
//!
//! # Grammar
//!
//! ```text
//! statement    ::= "typedef"? declspec declarator ("," declarator)* ";"
//! declarator   ::= "*"* ( "(" declarator ")" )? ident? suffix?
//! suffix       ::= "(" params ")" | "[" len "]" suffix?
//! ```
//!
//! C declarator syntax nests the shape (pointer/array/function) outside-in
//! relative to how the type tree must be built; a parenthesised group defers
//! which shape wraps which. The group is parsed against a placeholder base
//! and spliced over the suffix-built type afterwards (`attach_innermost`).

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, ParseErrorKind, Parser};
use crate::parser::types::{ArrayLen, Param, Type};

// Weighted specifier bits. Each of char/short/int/long and signed/unsigned
// occupies its own bit range so every legal keyword multiset sums to a
// unique counter value ("long long" legitimately takes two bits of its
// range).
const CNT_CHAR: u32 = 1 << 2;
const CNT_SHORT: u32 = 1 << 4;
const CNT_INT: u32 = 1 << 6;
const CNT_LONG: u32 = 1 << 8;
const CNT_SIGNED: u32 = 1 << 10;
const CNT_UNSIGNED: u32 = 1 << 12;

/// Every legal combination of `char`/`short`/`int`/`long`/`signed`/`unsigned`
/// by accumulated counter value. Absent combinations are invalid.
static SPECIFIER_COMBINATIONS: Lazy<FxHashMap<u32, Type>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    table.insert(CNT_CHAR, Type::Char);
    table.insert(CNT_CHAR + CNT_SIGNED, Type::Char);
    table.insert(CNT_CHAR + CNT_UNSIGNED, Type::UChar);
    table.insert(CNT_SHORT, Type::Short);
    table.insert(CNT_SHORT + CNT_INT, Type::Short);
    table.insert(CNT_SHORT + CNT_SIGNED, Type::Short);
    table.insert(CNT_SHORT + CNT_SIGNED + CNT_INT, Type::Short);
    table.insert(CNT_SHORT + CNT_UNSIGNED, Type::UShort);
    table.insert(CNT_SHORT + CNT_UNSIGNED + CNT_INT, Type::UShort);
    table.insert(CNT_INT, Type::Int);
    table.insert(CNT_SIGNED, Type::Int);
    table.insert(CNT_INT + CNT_SIGNED, Type::Int);
    table.insert(CNT_UNSIGNED, Type::UInt);
    table.insert(CNT_INT + CNT_UNSIGNED, Type::UInt);
    table.insert(CNT_LONG, Type::Long);
    table.insert(CNT_LONG + CNT_INT, Type::Long);
    table.insert(CNT_LONG + CNT_LONG, Type::Long);
    table.insert(CNT_LONG + CNT_LONG + CNT_INT, Type::Long);
    table.insert(CNT_LONG + CNT_SIGNED, Type::Long);
    table.insert(CNT_LONG + CNT_SIGNED + CNT_INT, Type::Long);
    table.insert(CNT_LONG + CNT_SIGNED + CNT_LONG, Type::Long);
    table.insert(CNT_LONG + CNT_SIGNED + CNT_LONG + CNT_INT, Type::Long);
    table.insert(CNT_LONG + CNT_UNSIGNED, Type::ULong);
    table.insert(CNT_LONG + CNT_UNSIGNED + CNT_INT, Type::ULong);
    table.insert(CNT_LONG + CNT_UNSIGNED + CNT_LONG, Type::ULong);
    table.insert(CNT_LONG + CNT_UNSIGNED + CNT_LONG + CNT_INT, Type::ULong);
    table
});

/// Type-name keywords that resolve alone and combine with nothing else.
fn primitive_kind(text: &str) -> Option<Type> {
    let ty = match text {
        "void" => Type::Void,
        "bool" => Type::Bool,
        "float" => Type::Float,
        "double" => Type::Double,
        "int8_t" => Type::I8,
        "int16_t" => Type::I16,
        "int32_t" => Type::I32,
        "int64_t" => Type::I64,
        "uint8_t" => Type::U8,
        "uint16_t" => Type::U16,
        "uint32_t" => Type::U32,
        "uint64_t" => Type::U64,
        "size_t" => Type::Size,
        "ssize_t" => Type::SSize,
        _ => return None,
    };
    Some(ty)
}

fn counter_weight(text: &str) -> u32 {
    match text {
        "char" => CNT_CHAR,
        "short" => CNT_SHORT,
        "int" => CNT_INT,
        "long" => CNT_LONG,
        "signed" => CNT_SIGNED,
        "unsigned" => CNT_UNSIGNED,
        _ => panic!("BUG: '{}' is not a combining specifier", text),
    }
}

/// Replace the placeholder leaf at the innermost slot of `shell` with
/// `inner`. The shell is the parenthesised superstructure, built over a
/// placeholder base; its single-child chain (pointer/array base, function
/// return) ends at that placeholder.
fn attach_innermost(shell: &mut Type, inner: Type) {
    match shell {
        Type::Pointer(base) | Type::Array { base, .. } => {
            if base.is_composite() {
                attach_innermost(base.as_mut(), inner);
            } else {
                **base = inner;
            }
        }
        Type::Function { ret, .. } => {
            if ret.is_composite() {
                attach_innermost(ret.as_mut(), inner);
            } else {
                **ret = inner;
            }
        }
        // The shell was a bare parenthesised identifier; the placeholder is
        // the shell itself.
        other => *other = inner,
    }
}

impl Parser {
    /// Parse every statement and return the declaration table.
    pub fn parse(mut self) -> Result<FxHashMap<String, Type>, ParseError> {
        while !self.is_at_end() {
            let is_typedef = self.consume_keyword("typedef");
            let base = self.declspec()?;
            self.declaration_list(base, is_typedef)?;
        }
        Ok(self.decls)
    }

    /// Parse the comma-separated declarators of one statement, inserting
    /// each into the typedef or declaration table.
    fn declaration_list(
        &mut self,
        base: Type,
        is_typedef: bool,
    ) -> Result<(), ParseError> {
        let mut first = true;
        while !self.consume(";") {
            if !first {
                self.expect(",")?;
            }
            first = false;

            let start = self.position_info();
            let (ty, ident) = self.declarator(base.clone(), false)?;
            let Some(name) = ident else {
                let what = if is_typedef { "typedef name" } else { "identifier" };
                return Err(self.error_at(
                    ParseErrorKind::MissingIdentifier,
                    format!("{} omitted", what),
                    start,
                ));
            };

            if is_typedef {
                self.typedefs.insert(name, ty);
            } else {
                self.decls.insert(name, ty);
            }
        }
        Ok(())
    }

    /// Resolve a base type from the current token run.
    ///
    /// A known typedef name is consumed alone and returns the bound type
    /// unchanged. Otherwise one or more type-name tokens are consumed
    /// greedily: primitives resolve immediately, the remaining keywords
    /// accumulate into the specifier counter.
    pub(crate) fn declspec(&mut self) -> Result<Type, ParseError> {
        if let Some(token) = self.peek() {
            if let Some(ty) = self.typedefs.get(&token.text) {
                let ty = ty.clone();
                self.advance();
                return Ok(ty);
            }
        }

        let start = self.position_info();
        if self.peek().map(|t| t.kind) != Some(TokenKind::TypeName) {
            return Err(self.error_at(
                ParseErrorKind::UnrecognisedTypename,
                "unrecognised typename".to_string(),
                start,
            ));
        }

        let mut counter = 0u32;
        let mut resolved = Type::Int;

        while let Some(token) = self.peek() {
            if token.kind != TokenKind::TypeName {
                break;
            }
            let text = token.text.clone();
            self.advance();

            if let Some(ty) = primitive_kind(&text) {
                return Ok(ty);
            }

            counter += counter_weight(&text);
            match SPECIFIER_COMBINATIONS.get(&counter) {
                Some(ty) => resolved = ty.clone(),
                None => {
                    return Err(self.error_at(
                        ParseErrorKind::InvalidTypeCombination,
                        "invalid combination of typenames".to_string(),
                        start,
                    ));
                }
            }
        }

        Ok(resolved)
    }

    /// Resolve one declarator over `base`, returning the assembled type and
    /// the declared name (if any).
    pub(crate) fn declarator(
        &mut self,
        base: Type,
        is_func_param: bool,
    ) -> Result<(Type, Option<String>), ParseError> {
        let mut ty = self.pointers(base);
        let mut ident = None;
        let mut shell = None;

        if self.consume("(") {
            // Either a parenthesised sub-declarator or garbage; parse it
            // against a placeholder base and splice below once the suffixes
            // outside the parentheses are known.
            let (nested, nested_ident) =
                self.declarator(Type::Int, is_func_param)?;
            self.expect(")")?;
            shell = Some(nested);
            ident = nested_ident;
        }

        if ident.is_none() {
            ident = self.consume_ident();
        }

        ty = self.type_suffix(ty, is_func_param)?;

        if let Some(mut outer) = shell {
            attach_innermost(&mut outer, ty);
            ty = outer;
        }

        Ok((ty, ident))
    }

    /// Consume leading `*`s, innermost applied first.
    fn pointers(&mut self, mut ty: Type) -> Type {
        while self.consume("*") {
            ty = Type::pointer_to(ty);
        }
        ty
    }

    /// Consume one trailing suffix: a function parameter list or an array
    /// dimension.
    fn type_suffix(
        &mut self,
        ty: Type,
        is_func_param: bool,
    ) -> Result<Type, ParseError> {
        if self.consume("(") {
            return self.func_ty(ty);
        }
        if self.consume("[") {
            return self.array_dimensions(ty, is_func_param);
        }
        Ok(ty)
    }

    /// Parse a function parameter list after `(`, wrapping `ret`.
    fn func_ty(&mut self, ret: Type) -> Result<Type, ParseError> {
        // (void) is an empty parameter list
        if let (Some(first), Some(second)) = (self.peek(), self.peek_ahead(1)) {
            if first.text == "void" && second.text == ")" {
                self.advance();
                self.advance();
                return Ok(Type::function(ret, Vec::new()));
            }
        }

        let mut params: Vec<Param> = Vec::new();
        let mut first = true;
        while !self.consume(")") {
            if !first {
                self.expect(",")?;
            }
            first = false;

            let base = self.declspec()?;
            let start = self.position_info();
            let (ty, name) = self.declarator(base, true)?;

            if let Type::Array {
                len: ArrayLen::Named(len_name),
                ..
            } = &ty
            {
                let matched = params
                    .iter()
                    .any(|p| p.name.as_deref() == Some(len_name.as_str()));
                if !matched {
                    return Err(self.error_at(
                        ParseErrorKind::UnresolvedArrayLengthParameter,
                        "non-integer-literal array length does not match \
                         any preceding function parameter name"
                            .to_string(),
                        start,
                    ));
                }
            }

            params.push(Param { ty, name });
        }

        Ok(Type::function(ret, params))
    }

    /// Parse one array dimension after `[`, wrapping `base`.
    ///
    /// Further suffixes are resolved before wrapping, so `a[3][4]` becomes
    /// array-of-3 of array-of-4.
    fn array_dimensions(
        &mut self,
        base: Type,
        is_func_param: bool,
    ) -> Result<Type, ParseError> {
        let start = self.position_info();
        let mut text = String::new();
        while !self.consume("]") {
            match self.peek() {
                Some(token) => {
                    text.push_str(&token.text);
                    self.advance();
                }
                None => {
                    return Err(self.error_here(
                        ParseErrorKind::ExpectedToken,
                        "expected ']'".to_string(),
                    ));
                }
            }
        }

        let len = if text.is_empty() {
            ArrayLen::Unspecified
        } else if let Ok(n) = text.parse::<u64>() {
            ArrayLen::Literal(n)
        } else if is_func_param {
            ArrayLen::Named(text)
        } else {
            return Err(self.error_at(
                ParseErrorKind::NonLiteralArrayLength,
                "non-integer-literal array length is not allowed outside \
                 a function parameter list"
                    .to_string(),
                start,
            ));
        };

        let base = self.type_suffix(base, is_func_param)?;
        Ok(Type::array_of(base, len))
    }
}
