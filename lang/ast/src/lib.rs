mod expr;
mod ident;
mod stmt;
mod traits;
mod unparse;
pub mod visit;

pub use expr::*;
pub use ident::*;
pub use stmt::*;
pub use traits::*;
pub use unparse::repr_str;
pub use visit::{Visit, Visitor};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}
