//! Edit distance and closest-name matching

/// Levenshtein distance between two strings, compared byte by byte
///
/// Uses a single row of `a.len() + 1` cells.
#[must_use]
#[inline]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=a.len()).collect();

    for (i, &b_byte) in b.iter().enumerate() {
        let mut last_diag = row[0];
        row[0] = i + 1;
        for (j, &a_byte) in a.iter().enumerate() {
            let old_diag = row[j + 1];
            let cost = usize::from(a_byte != b_byte);
            row[j + 1] = (row[j + 1] + 1)
                .min(row[j] + 1)
                .min(last_diag + cost);
            last_diag = old_diag;
        }
    }

    row[a.len()]
}

/// Pick the candidate closest to `name`
///
/// Ties are broken by the lexicographically smaller candidate. The match is
/// rejected when the distance is not below the candidate's length plus one.
#[must_use]
#[inline]
pub fn closest_match<'names, I>(name: &str, candidates: I) -> Option<&'names str>
where
    I: IntoIterator<Item = &'names str>,
{
    let (best, distance) = candidates
        .into_iter()
        .map(|candidate| (candidate, levenshtein_distance(name, candidate)))
        .min_by(|(left, left_distance), (right, right_distance)| {
            left_distance.cmp(right_distance).then_with(|| left.cmp(right))
        })?;

    if !best.is_empty() && distance < best.len() + 1 {
        return Some(best);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitten_sitting() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn identical_strings_have_zero_distance() {
        for word in ["", "a", "help", "defenestrate"] {
            assert_eq!(levenshtein_distance(word, word), 0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let words = ["", "flip", "flap", "flop", "status", "help", "hlp"];
        for a in words {
            for b in words {
                assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a));
            }
        }
    }

    #[test]
    fn empty_against_word_is_word_length() {
        assert_eq!(levenshtein_distance("", "status"), 6);
        assert_eq!(levenshtein_distance("abc", ""), 3);
    }

    #[test]
    fn suggests_help_for_hlp() {
        assert_eq!(closest_match("hlp", ["help", "list", "status"]), Some("help"));
    }

    #[test]
    fn ties_break_lexicographically() {
        assert_eq!(closest_match("flxp", ["flop", "flap", "flip"]), Some("flap"));
    }

    #[test]
    fn far_away_names_are_rejected() {
        assert_eq!(closest_match("barsomethingfoo", ["foo"]), None);
        assert_eq!(closest_match("anything", std::iter::empty()), None);
    }

    #[test]
    fn threshold_is_candidate_length_plus_one() {
        // distance("xyz", "ab") == 3, which is not below len("ab") + 1
        assert_eq!(closest_match("xyz", ["ab"]), None);
        // distance("xy", "ab") == 2, which is
        assert_eq!(closest_match("xy", ["ab"]), Some("ab"));
    }
}
