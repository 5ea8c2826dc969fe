use aerie_core::Snapshot;

/// Assemble the single prompt handed to the model: fixed instruction, fleet
/// snapshot, compacted transcript, trailing directive. The exact text,
/// single leading spaces included, is what the deployed dashboard was tuned
/// against; changing it changes answer quality.
pub fn build_prompt(snapshot: &Snapshot, transcript: &str) -> String {
    format!(
        "You are a mission assistant with access to the drone and mission database.\n\n \
         Database Context:\n{}\n\n \
         Conversation History:\n{}\n\n \
         Using the above information, respond accurately to the latest user message.",
        snapshot.as_str(),
        transcript,
    )
}
