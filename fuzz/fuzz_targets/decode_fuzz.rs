//! Decode fuzz target: arbitrary text through the decoder, then any decoded tree
//! through encode and decode again. Neither step may panic and the second decode
//! must reproduce the tree.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let tree = match pain::decode(s) {
        Ok(t) => t,
        Err(_) => return,
    };
    let text = pain::encode(&tree).expect("decoded trees always encode");
    let again = pain::decode(&text).expect("encoded text always decodes");
    assert_eq!(again, tree);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
