mod addons;
mod aggregator;

pub use addons::{AddonInfo, AddonRegistry};
pub use aggregator::{
    aggregate, Annotations, CopyBlockAction, Decoration, DecorationStyle, InlayHint,
    COPY_ACTION_TITLE,
};
