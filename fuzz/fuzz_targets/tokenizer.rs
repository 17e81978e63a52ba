#![no_main]

use email_core::{collapse_whitespace, has_separator, tokenize, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let tokens = tokenize(raw);
    for token in &tokens {
        assert!(!token.is_empty());
        assert!(!has_separator(token), "separator inside token {token:?}");
        let _ = validate(token);
    }
    assert_eq!(tokenize(&tokens.join(" ")), tokens);
    assert_eq!(tokenize(&collapse_whitespace(raw)), tokens);
});
