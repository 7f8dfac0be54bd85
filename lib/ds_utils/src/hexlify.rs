/// Lowercase hexadecimal rendering of a bytes slice, as used in dex
/// metadata files.
#[must_use]
pub fn hexlify(arr: &[u8]) -> String {
    arr.iter()
        .map(|x| format!("{x:02x}"))
        .collect::<Vec<String>>()
        .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexlify_test() {
        assert_eq!(hexlify(&[15, 60, 99]), String::from("0f3c63"));
    }

    #[test]
    fn hexlify_empty() {
        assert_eq!(hexlify(&[]), String::new());
    }
}
