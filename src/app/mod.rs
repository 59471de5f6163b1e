// Application layer: the two analysis pipelines wired from core algorithms and adapters.

pub mod pipelines;
