use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

/// Who is asking for an upload URL on an upload link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploaderIdentity {
    User(String),
    Anonymous { email: Option<String> },
}

#[derive(Serialize)]
struct AnonymousUserPayload<'a> {
    anonymous_user: &'a str,
}

impl UploaderIdentity {
    /// An authenticated username wins over whatever email the session holds.
    pub fn resolve(username: Option<String>, session_email: Option<String>) -> Self {
        match username {
            Some(u) if !u.is_empty() => UploaderIdentity::User(u),
            _ => UploaderIdentity::Anonymous {
                email: session_email.filter(|e| !e.is_empty()),
            },
        }
    }

    pub fn anonymous_user(&self) -> &str {
        match self {
            UploaderIdentity::User(name) => name,
            UploaderIdentity::Anonymous { email } => email.as_deref().unwrap_or(""),
        }
    }

    /// The `obj_id` handed to the file server. The server compares it as a
    /// literal string, so it is rendered the way Python's `json.dumps` would.
    pub fn to_payload(&self) -> anyhow::Result<String> {
        let payload = AnonymousUserPayload {
            anonymous_user: self.anonymous_user(),
        };
        let mut out = Vec::with_capacity(32);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, PyJsonFormatter);
        payload.serialize(&mut ser)?;
        Ok(String::from_utf8(out)?)
    }
}

/// `", "` / `": "` separators and `\uXXXX` escapes for non-ASCII.
struct PyJsonFormatter;

impl Formatter for PyJsonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
