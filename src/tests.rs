#![cfg(test)]

use hex_literal::hex;

use crate::{backend::BackendKind, xor_in_place, Block};

pub(crate) type TestCase<const N: usize> = ([u8; N], [u8; 16], [u8; 16]);

pub(crate) static AES_128_TESTS: &[TestCase<16>] = &[
    (
        hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        hex!("3243f6a8885a308d313198a2e0370734"),
        hex!("3925841d02dc09fbdc118597196a0b32"),
    ),
    (
        hex!("000102030405060708090a0b0c0d0e0f"),
        hex!("00112233445566778899aabbccddeeff"),
        hex!("69c4e0d86a7b0430d8cdb78070b4c55a"),
    ),
];

pub(crate) static AES_192_TESTS: &[TestCase<24>] = &[(
    hex!("000102030405060708090a0b0c0d0e0f1011121314151617"),
    hex!("00112233445566778899aabbccddeeff"),
    hex!("dda97ca4864cdfe06eaf70a0ec0d7191"),
)];

pub(crate) static AES_256_TESTS: &[TestCase<32>] = &[(
    hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"),
    hex!("00112233445566778899aabbccddeeff"),
    hex!("8ea2b7ca516745bfeafc49904b496089"),
)];

pub(crate) static SP800_38A_ECB: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/sp800-38a-ecb.rsp"
));
pub(crate) static SP800_38A_CBC: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/sp800-38a-cbc.rsp"
));
pub(crate) static SP800_38A_CTR: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/sp800-38a-ctr.rsp"
));

pub(crate) static ECB_MCT_128: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/ECBMCT128.rsp"
));
pub(crate) static CBC_MCT_256: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/CBCMCT256.rsp"
));
pub(crate) static ECB_GFSBOX_128: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/ECBGFSbox128.rsp"
));
pub(crate) static CBC_GFSBOX_128: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/CBCGFSbox128.rsp"
));

/// Inner iterations per Monte Carlo stage.
pub(crate) const MCT_ITERATIONS: usize = 1000;

/// Returns how many Monte Carlo stages to run on `kind`.
///
/// The portable backend is slow in debug builds, so it only
/// runs the first few stages.
pub(crate) fn mct_stages(kind: BackendKind) -> usize {
    match kind {
        BackendKind::Hardware => 100,
        BackendKind::Portable => 10,
    }
}

/// Derives the key for the next Monte Carlo stage from the last
/// two outputs of the current one.
pub(crate) fn key_shuffle(key: &mut [u8], current: &Block, prev: &Block) {
    match key.len() {
        16 => xor_in_place(key, current),
        24 => {
            let (lhs, rhs) = key.split_at_mut(8);
            xor_in_place(lhs, &prev[8..]);
            xor_in_place(rhs, current);
        }
        32 => {
            let (lhs, rhs) = key.split_at_mut(16);
            xor_in_place(lhs, prev);
            xor_in_place(rhs, current);
        }
        n => panic!("invalid key length: {n}"),
    }
}

/// Returns the records of `section` (`ENCRYPT` or `DECRYPT`).
pub(crate) fn load_section(data: &str, section: &str) -> Vec<RspCase> {
    let cases: Vec<_> = load_rsp(data)
        .into_iter()
        .filter(|c| c.section == section)
        .collect();
    assert!(!cases.is_empty(), "no `{section}` records");
    cases
}

/// Routes `tracing` output to the test harness.
///
/// Filtered by `RUST_LOG`; safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One record of a `.rsp` vector file.
#[derive(Clone, Debug, Default)]
pub(crate) struct RspCase {
    pub section: String,
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl RspCase {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn block(&self, field: &str) -> Block {
        self.bytes(field)
            .try_into()
            .unwrap_or_else(|v: Vec<u8>| panic!("{}: `{field}` is {} bytes", self.name, v.len()))
    }

    pub fn bytes(&self, field: &str) -> Vec<u8> {
        let v = self
            .get(field)
            .unwrap_or_else(|| panic!("{}: missing `{field}`", self.name));
        hex::decode(v).unwrap_or_else(|err| panic!("{}: bad `{field}`: {err}", self.name))
    }
}

/// Parses a CAVP style `.rsp` file.
///
/// `[SECTION]` lines name the records that follow, `#` starts a
/// comment and blank lines separate records.
pub(crate) fn load_rsp(data: &str) -> Vec<RspCase> {
    let mut cases = Vec::new();
    let mut section = String::new();
    let mut cur = RspCase::default();

    let mut flush = |cur: &mut RspCase, section: &str| {
        if cur.fields.is_empty() {
            return;
        }
        let count = cur.get("COUNT").unwrap_or("?").to_owned();
        cur.name = format!("{section} #{count}");
        cur.section = section.to_owned();
        cases.push(core::mem::take(cur));
    };

    for line in data.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            flush(&mut cur, &section);
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            flush(&mut cur, &section);
            section = name.to_owned();
            continue;
        }
        let (k, v) = line
            .split_once('=')
            .unwrap_or_else(|| panic!("malformed line: {line:?}"));
        cur.fields.push((k.trim().to_owned(), v.trim().to_owned()));
    }
    flush(&mut cur, &section);

    assert!(!cases.is_empty(), "no test vectors");
    cases
}

/// Checks a [`CipherBackend`][crate::backend::CipherBackend]
/// against the FIPS-197 vectors.
///
/// `impl_test_aes!(name, backend)` defines a test; the `@check`
/// form runs the checks inline against a backend value that is
/// already in scope.
macro_rules! impl_test_aes {
    ($name:ident, $backend:expr) => {
        #[test]
        fn $name() {
            let backend = $backend;
            $crate::tests::impl_test_aes!(@check backend);
        }
    };
    (@check $b:ident) => {{
        use $crate::backend::CipherBackend as _;

        fn check<const N: usize>(
            b: &impl $crate::backend::CipherBackend,
            tests: &[$crate::tests::TestCase<N>],
        ) {
            for (i, &(key, pt, ct)) in tests.iter().enumerate() {
                let key = b.expand_key(&key).unwrap();
                assert_eq!(key.size().bytes(), N, "#{i}");
                let mut block = pt;
                b.encrypt_block(&key, &mut block);
                assert_eq!(block, ct, "{:?} N={N} #{i}: encrypt", b.kind());
                b.decrypt_block(&key, &mut block);
                assert_eq!(block, pt, "{:?} N={N} #{i}: decrypt", b.kind());
            }
        }
        check(&$b, $crate::tests::AES_128_TESTS);
        check(&$b, $crate::tests::AES_192_TESTS);
        check(&$b, $crate::tests::AES_256_TESTS);

        for n in [0, 15, 17, 33] {
            assert_eq!(
                $b.expand_key(&vec![0u8; n]).unwrap_err(),
                $crate::Error::InvalidKeyLength(n)
            );
        }
    }};
}
pub(crate) use impl_test_aes;

#[test]
fn test_load_rsp() {
    let cases = load_rsp(
        "# header\n\
         [ONE]\n\
         \n\
         COUNT = 0\n\
         KEY = 00ff\n\
         \n\
         COUNT = 1\n\
         KEY = 0102\n\
         [TWO]\n\
         COUNT = 0\n\
         KEY =\n",
    );
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0].name, "ONE #0");
    assert_eq!(cases[0].bytes("KEY"), [0x00, 0xff]);
    assert_eq!(cases[1].name, "ONE #1");
    assert_eq!(cases[2].name, "TWO #0");
    assert_eq!(cases[2].section, "TWO");
    assert!(cases[2].bytes("KEY").is_empty());
    assert_eq!(cases[2].get("IV"), None);
}

#[test]
fn test_vector_files_parse() {
    for (data, fields) in [
        (SP800_38A_ECB, &["KEY", "PLAINTEXT", "CIPHERTEXT"][..]),
        (SP800_38A_CBC, &["KEY", "IV", "PLAINTEXT", "CIPHERTEXT"][..]),
        (SP800_38A_CTR, &["KEY", "IV", "PLAINTEXT", "CIPHERTEXT"][..]),
    ] {
        let cases = load_rsp(data);
        assert_eq!(cases.len(), 3);
        for case in cases {
            for f in fields {
                assert!(!case.bytes(f).is_empty(), "{}: {f}", case.name);
            }
        }
    }
}

#[test]
fn test_key_shuffle() {
    let current = [0x0F; 16];
    let prev: Block = core::array::from_fn(|i| i as u8);

    let mut key = [0xF0u8; 16];
    key_shuffle(&mut key, &current, &prev);
    assert_eq!(key, [0xFF; 16]);

    let mut key = [0u8; 24];
    key_shuffle(&mut key, &current, &prev);
    assert_eq!(key[..8], prev[8..]);
    assert_eq!(key[8..], current);

    let mut key = [0u8; 32];
    key_shuffle(&mut key, &current, &prev);
    assert_eq!(key[..16], prev);
    assert_eq!(key[16..], current);
}

#[test]
fn test_monte_carlo_files_parse() {
    for data in [ECB_MCT_128, CBC_MCT_256] {
        for section in ["ENCRYPT", "DECRYPT"] {
            let cases = load_section(data, section);
            assert_eq!(cases.len(), 100, "{section}");
            assert!(cases.len() >= mct_stages(BackendKind::Hardware));
        }
    }
    for data in [ECB_GFSBOX_128, CBC_GFSBOX_128] {
        assert_eq!(load_section(data, "ENCRYPT").len(), 7);
        assert_eq!(load_section(data, "DECRYPT").len(), 7);
    }
}
