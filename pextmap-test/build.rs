use pextmap::{codegen::CodeGenerator, Builder, Map};
use std::path::PathBuf;

const STATUS_CODES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (204, "No Content"),
    (206, "Partial Content"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Content Too Large"),
    (414, "URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Range Not Satisfiable"),
    (418, "I'm a teapot"),
    (422, "Unprocessable Content"),
    (426, "Upgrade Required"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
];

fn main() {
    println!("cargo::rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());

    let keyset = Builder::new()
        .build_pext_keyset(STATUS_CODES.iter().map(|&(code, _)| code))
        .expect("Failed to build status keyset");
    let status = Map::from_entries(keyset, STATUS_CODES.iter().copied());
    let code = CodeGenerator::new().generate(&status);
    std::fs::write(out_dir.join("status.rs"), code.to_string()).unwrap();

    let hex_digits = Builder::new()
        .build_map(
            ('0'..='9')
                .chain('a'..='f')
                .chain('A'..='F')
                .map(|c| (c, c.to_digit(16).unwrap() as u8)),
        )
        .expect("Failed to build hex digit map");
    let code = CodeGenerator::new().generate(&hex_digits);
    std::fs::write(out_dir.join("hex_digits.rs"), code.to_string()).unwrap();
}
