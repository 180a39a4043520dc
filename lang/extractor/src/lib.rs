//! Static discovery of the routes declared in a TurboX application.
//!
//! Paths given to routing decorators are folded to string constants using only
//! module-level literal bindings. A decorator whose path cannot be folded is
//! dropped here; the validator reports it separately.

mod constants;
mod decorator;
mod extract;
mod method;
mod resolve;
mod traverse;

pub use constants::ConstantTable;
pub use decorator::{
    DecoratorKind, FRAMEWORK_CONSTRUCTOR, MethodsSpec, RouteDecorator, match_route_decorator,
};
pub use extract::{Extraction, RouteDecl, extract};
pub use method::Method;
pub use resolve::resolve;
pub use traverse::{ModuleState, traverse};
