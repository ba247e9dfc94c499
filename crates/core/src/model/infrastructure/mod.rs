pub mod model_resolver;
