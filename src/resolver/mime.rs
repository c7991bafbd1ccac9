//! Content-type sniffing from leading bytes.
//!
//! Only the first [`SNIFF_LEN`] bytes are inspected. The result is a bare
//! MIME type (plus a charset parameter for text), suitable for
//! [`FileResolver::files_by_mime_type`](super::FileResolver::files_by_mime_type).

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 3072;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// Sniff the MIME type of `content`.
#[must_use]
pub fn sniff(content: &[u8]) -> &'static str {
    if content.is_empty() {
        return TEXT_PLAIN;
    }
    let head = &content[..content.len().min(SNIFF_LEN)];

    if let Some(mime) = sniff_binary(head) {
        return mime;
    }
    if let Some(mime) = sniff_script(head) {
        return mime;
    }
    if head.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }
    if is_text(head, content.len() > SNIFF_LEN) {
        return TEXT_UTF8;
    }
    OCTET_STREAM
}

fn sniff_binary(head: &[u8]) -> Option<&'static str> {
    if head.starts_with(b"\x7fELF") {
        return Some(elf_type(head));
    }
    if is_macho(head) {
        return Some("application/x-mach-binary");
    }
    if head.starts_with(b"\xca\xfe\xba\xbe") {
        // Shared by fat Mach-O and Java classes; classes carry a major version >= 45.
        let second = head.get(4..8).map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
        return Some(match second {
            Some(n) if n < 45 => "application/x-mach-binary",
            _ => "application/x-java-applet",
        });
    }
    if head.starts_with(b"MZ") {
        return Some("application/vnd.microsoft.portable-executable");
    }
    if head.starts_with(b"PK\x03\x04") {
        if contains(head, b"META-INF/") {
            return Some("application/jar");
        }
        return Some("application/zip");
    }
    if head.starts_with(b"\x1f\x8b") {
        return Some("application/gzip");
    }
    if head.starts_with(b"BZh") {
        return Some("application/x-bzip2");
    }
    if head.starts_with(b"\xfd7zXZ\x00") {
        return Some("application/x-xz");
    }
    if head.starts_with(b"\x28\xb5\x2f\xfd") {
        return Some("application/zstd");
    }
    if head.starts_with(b"!<arch>\n") {
        if head.get(8..21) == Some(b"debian-binary".as_slice()) {
            return Some("application/vnd.debian.binary-package");
        }
        return Some("application/x-archive");
    }
    if head.starts_with(b"\xed\xab\xee\xdb") {
        return Some("application/x-rpm");
    }
    if head.get(257..262) == Some(b"ustar".as_slice()) {
        return Some("application/x-tar");
    }
    None
}

fn elf_type(head: &[u8]) -> &'static str {
    // e_type sits at offset 16, in the byte order named by EI_DATA.
    let Some(raw) = head.get(16..18) else {
        return "application/x-elf";
    };
    let e_type = match head.get(5) {
        Some(2) => u16::from_be_bytes([raw[0], raw[1]]),
        _ => u16::from_le_bytes([raw[0], raw[1]]),
    };
    match e_type {
        1 => "application/x-object",
        2 => "application/x-executable",
        3 => "application/x-sharedlib",
        4 => "application/x-coredump",
        _ => "application/x-elf",
    }
}

fn is_macho(head: &[u8]) -> bool {
    const MAGICS: [[u8; 4]; 4] = [
        [0xfe, 0xed, 0xfa, 0xce],
        [0xfe, 0xed, 0xfa, 0xcf],
        [0xce, 0xfa, 0xed, 0xfe],
        [0xcf, 0xfa, 0xed, 0xfe],
    ];
    MAGICS.iter().any(|m| head.starts_with(m))
}

fn sniff_script(head: &[u8]) -> Option<&'static str> {
    let rest = head.strip_prefix(b"#!")?;
    let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let line = std::str::from_utf8(&rest[..line_end]).ok()?;
    let mut words = line.split_whitespace();
    let program = words.next()?;
    let interpreter = match program.rsplit('/').next() {
        Some("env") => words.next().unwrap_or(""),
        Some(name) => name,
        None => "",
    };
    let mime = if interpreter.starts_with("python") {
        "text/x-python"
    } else if interpreter.starts_with("perl") {
        "text/x-perl"
    } else if matches!(interpreter, "sh" | "bash" | "dash" | "zsh" | "ash" | "ksh") {
        "text/x-shellscript"
    } else {
        return None;
    };
    Some(mime)
}

fn is_text(head: &[u8], truncated: bool) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A window cut through a multi-byte sequence is still text.
        Err(e) => truncated && e.error_len().is_none(),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
