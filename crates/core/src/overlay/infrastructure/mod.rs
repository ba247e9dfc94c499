pub mod raster_canvas;
pub mod recording_canvas;
