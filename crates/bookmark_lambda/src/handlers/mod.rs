pub mod dispatcher;
pub mod resolver;
