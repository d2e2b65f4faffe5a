/// Greedy line accumulation. Lines are appended to the current chunk while it
/// stays under `max_chunk_size` characters; a line that does not fit starts
/// the next chunk. A single line longer than the limit becomes its own chunk.
/// Chunks are trimmed and empty chunks are dropped.
pub fn split_text_into_chunks(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if current_len + line_len < max_chunk_size {
            current.push_str(line);
            current.push('\n');
            current_len += line_len + 1;
        } else {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current.push_str(line);
            current.push('\n');
            current_len = line_len + 1;
        }
    }

    push_trimmed(&mut chunks, &current);
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Splits `count` across `chunks` by integer division. The remainder goes
/// one apiece to the leading chunks, so the allocations always sum to `count`.
pub fn distribute(count: usize, chunks: usize) -> Vec<usize> {
    if chunks == 0 {
        return Vec::new();
    }

    let base = count / chunks;
    let remainder = count % chunks;

    (0..chunks)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}
