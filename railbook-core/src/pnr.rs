use uuid::Uuid;

/// Length of a PNR token in characters.
pub const PNR_LEN: usize = 8;

/// Generate a candidate PNR: the first 8 hex chars of a v4 UUID,
/// uppercased. Short enough to read over a phone, 32 bits of entropy.
/// Uniqueness is enforced by the booking transaction, which checks the
/// store and regenerates on collision.
pub fn generate() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..PNR_LEN].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pnr_shape() {
        let pnr = generate();
        assert_eq!(pnr.len(), PNR_LEN);
        assert!(pnr.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_pnr_is_not_constant() {
        // Not a collision proof, just a sanity check that we are not
        // handing out the same token every time.
        let a = generate();
        let b = generate();
        let c = generate();
        assert!(a != b || b != c);
    }
}
