pub mod capture {
    pub mod domain {
        pub mod encoded_image;
        pub mod verification_payload;
        pub mod video_source;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detect_outcome;
        pub mod detection;
        pub mod detector_options;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod model {
    pub mod domain {
        pub mod model_fetcher;
        pub mod model_state;
    }
    pub mod infrastructure;
}

pub mod overlay {
    pub mod domain {
        pub mod canvas;
        pub mod overlay_renderer;
        pub mod scale_factors;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod detection_engine;
    pub mod face_capture_session;
    pub mod model_loader;
}

pub mod shared {
    pub mod config;
    pub mod constants;
    pub mod frame;
    pub mod notifier;
}

pub mod verification {
    pub mod domain {
        pub mod verify_error;
    }
    pub mod infrastructure;
}

#[cfg(test)]
mod test_support;
