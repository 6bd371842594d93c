/// Errors surfaced by [`SerializedPipeline::deliver`](crate::SerializedPipeline::deliver).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The item's producer returned an error, panicked, or was aborted
    /// before publishing a result.
    #[error("pipeline item {index} failed to produce a value")]
    ItemFailed {
        index: usize,
        #[source]
        cause: anyhow::Error,
    },

    /// The sink rejected the item's value.
    #[error("sink failed while consuming pipeline item {index}")]
    ConsumeFailed {
        index: usize,
        #[source]
        cause: anyhow::Error,
    },
}

impl PipelineError {
    /// Submission index of the item the pipeline failed at.
    pub fn index(&self) -> usize {
        match self {
            Self::ItemFailed { index, .. } | Self::ConsumeFailed { index, .. } => *index,
        }
    }
}
