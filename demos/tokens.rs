//! Lexes a literal snippet and prints every token kind in order.

use cadence_lang::lex::{Lexer, TokenKind};

fn main() {
    let source = "bpm 120  note 60\nsend 1 3:8 rep 2";
    let mut lx = Lexer::new(source);
    loop {
        let tok = lx.next();
        if tok.kind == TokenKind::Terminator {
            break;
        }
        println!("{:>10?}  {:?}", tok.kind, tok.span.slice(source));
    }
}
