const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

pub fn fnv1a_32(text: &str) -> u32 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Maps a string to `[0, 1)`; identical input always yields the identical value.
pub fn stable_unit(text: &str) -> f32 {
    // top 24 bits keep the value exactly representable and below 1.0
    (fnv1a_32(text) >> 8) as f32 / 16_777_216.0
}

/// Four independent values in `[0, 1)` keyed by an edge id.
pub fn stable_quad(id: &str) -> [f32; 4] {
    [0usize, 1, 2, 3].map(|slot| stable_unit(&format!("{id}:{slot}")))
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut truncated = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv1a_32(""), 0x811c_9dc5);
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
        assert_eq!(fnv1a_32("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn stable_quad_is_repeatable_and_in_range() {
        let first = stable_quad("xuan->qingming");
        let second = stable_quad("xuan->qingming");
        assert_eq!(first, second);
        for value in first {
            assert!((0.0..1.0).contains(&value));
        }
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefgh", 5), "abcd…");
    }
}
