//! The two Pratt binding-power tables: one for `literal_expr` (numeric),
//! one for `sequence_expr`. Lower numbers bind looser; an infix/postfix
//! operator's right binding power is its left binding power plus one,
//! encoding left-associativity.

use crate::lex::TokenKind;

/// Which of the four operator positions a binding-power lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpFix {
    /// A numeric prefix operator (`len`, `beat`, `skip`).
    LitPrefix,
    /// A numeric infix operator (`+ - * /`).
    LitInfix,
    /// A sequence prefix operator (`rev`, `invert`).
    SeqPrefix,
    /// A sequence infix operator (`cat or and xor rotl rotr rep bpm map
    /// chain`).
    SeqInfix,
    /// A sequence postfix operator (`car cdr dbg`).
    SeqPostfix,
}

const LEFT: u32 = 1;

/// Numeric precedence: `+ -` loosest, then `* /`, then prefix `len/beat/skip`
/// tightest.
mod numeric {
    pub const ADD_SUB: u32 = 10;
    pub const MUL_DIV: u32 = 20;
    pub const PREFIX: u32 = 30;
}

/// Sequence precedence: `chain/map/dbg` loosest, then `car/cdr`, then the
/// Boolean/rotate/rep/bpm infix family, then prefix `rev/invert` tightest.
mod seq {
    pub const CHAIN_MAP_DBG: u32 = 10;
    pub const CAR_CDR: u32 = 20;
    pub const CAT_FAMILY: u32 = 30;
    pub const PREFIX: u32 = 40;
}

/// Looks up the `(left, right)` binding power of `kind` used as `fix`.
///
/// Returns `None` when `kind` has no defined binding power in that
/// position — the caller should treat this as an internal "should be
/// unreachable" condition, since `is_*` predicates in `parse::sequence`/
/// `parse::literal` are expected to gate every call site.
#[must_use]
pub fn binding_power(kind: TokenKind, fix: OpFix) -> Option<(u32, u32)> {
    use TokenKind::{
        Add, And, BeatOf, Bpm, Car, Cat, Cdr, Chain, Dbg, Div, Invert, LenOf, Map, Mul, Or, Rep,
        Rev, Rotl, Rotr, SkipOf, Sub, Xor,
    };

    Some(match (fix, kind) {
        (OpFix::LitPrefix, LenOf) => (0, numeric::PREFIX),
        (OpFix::LitPrefix, BeatOf) => (0, numeric::PREFIX),
        (OpFix::LitPrefix, SkipOf) => (0, numeric::PREFIX),

        (OpFix::LitInfix, Add) => (numeric::ADD_SUB, numeric::ADD_SUB + LEFT),
        (OpFix::LitInfix, Sub) => (numeric::ADD_SUB, numeric::ADD_SUB + LEFT),
        (OpFix::LitInfix, Mul) => (numeric::MUL_DIV, numeric::MUL_DIV + LEFT),
        (OpFix::LitInfix, Div) => (numeric::MUL_DIV, numeric::MUL_DIV + LEFT),

        (OpFix::SeqPrefix, Rev) => (0, seq::PREFIX),
        (OpFix::SeqPrefix, Invert) => (0, seq::PREFIX),

        (OpFix::SeqInfix, Map) => (seq::CHAIN_MAP_DBG, seq::CHAIN_MAP_DBG + LEFT),
        (OpFix::SeqInfix, Chain) => (seq::CHAIN_MAP_DBG, seq::CHAIN_MAP_DBG + LEFT),
        (OpFix::SeqInfix, Cat) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, Or) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, And) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, Xor) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, Rotl) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, Rotr) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, Rep) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),
        (OpFix::SeqInfix, Bpm) => (seq::CAT_FAMILY, seq::CAT_FAMILY + LEFT),

        (OpFix::SeqPostfix, Dbg) => (seq::CHAIN_MAP_DBG, seq::CHAIN_MAP_DBG + LEFT),
        (OpFix::SeqPostfix, Car) => (seq::CAR_CDR, seq::CAR_CDR + LEFT),
        (OpFix::SeqPostfix, Cdr) => (seq::CAR_CDR, seq::CAR_CDR + LEFT),

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_binds_tighter_than_add() {
        let (add_l, _) = binding_power(TokenKind::Add, OpFix::LitInfix).unwrap();
        let (mul_l, _) = binding_power(TokenKind::Mul, OpFix::LitInfix).unwrap();
        assert!(mul_l > add_l);
    }

    #[test]
    fn rev_binds_tighter_than_cat_family() {
        let (_, rev_r) = binding_power(TokenKind::Rev, OpFix::SeqPrefix).unwrap();
        let (cat_l, _) = binding_power(TokenKind::Cat, OpFix::SeqInfix).unwrap();
        assert!(rev_r > cat_l);
    }

    #[test]
    fn infix_right_binding_power_is_left_plus_one() {
        let (l, r) = binding_power(TokenKind::Cat, OpFix::SeqInfix).unwrap();
        assert_eq!(r, l + 1);
    }

    #[test]
    fn unknown_combination_is_none() {
        assert_eq!(binding_power(TokenKind::Ident, OpFix::LitInfix), None);
    }
}
