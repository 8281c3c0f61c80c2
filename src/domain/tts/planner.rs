/// Sentences synthesized per engine call unless configured otherwise
pub const DEFAULT_SENTENCES_PER_CHUNK: usize = 5;

/// A run of consecutive sentences synthesized in one engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub sentences: Vec<String>,
}

impl Chunk {
    /// Text handed to the engine: sentences joined by a single space
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}

/// Group sentences into chunks of at most `max_per_chunk`, keeping order.
///
/// `max_per_chunk` of zero is treated as one.
pub fn plan_chunks(sentences: &[String], max_per_chunk: usize) -> Vec<Chunk> {
    sentences
        .chunks(max_per_chunk.max(1))
        .enumerate()
        .map(|(index, group)| Chunk {
            index,
            sentences: group.to_vec(),
        })
        .collect()
}
