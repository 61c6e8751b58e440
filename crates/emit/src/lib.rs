mod c;
mod common;
mod cpp;
mod java;
mod python;

pub use c::CEmitter;
pub use cpp::CppEmitter;
pub use java::JavaEmitter;
pub use python::PythonEmitter;
