pub mod alpha;
pub mod batch;
pub mod border_model;
pub mod composite;
pub mod downscale;
pub mod edges;
pub mod flood_fill;
pub mod inter_area;
pub mod kmeans;
pub mod morphology;
pub mod pipeline;
pub mod probability;
pub mod smoothing;
