use rand::Rng;

/// URL-safe alphabet for project ids
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of generated project ids
pub const PROJECT_ID_LEN: usize = 10;

/// Generates a fresh random project id.
///
/// Uniqueness relies on the 60 bits of entropy; existing ids are not checked.
pub fn generate_project_id() -> String {
    let mut rng = rand::rng();
    (0..PROJECT_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_length_and_alphabet() {
        let id = generate_project_id();
        assert_eq!(id.len(), PROJECT_ID_LEN);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_differ() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_project_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
