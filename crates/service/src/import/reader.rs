//! Minimal delimited-text reader for the bulk import.
//!
//! Handles quoted fields, doubled quotes, embedded separators and line breaks,
//! and both LF and CRLF record terminators. Blank lines are skipped.

pub struct CsvReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> CsvReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    /// Next record, or `None` at end of input.
    pub fn next_record(&mut self) -> Option<Vec<String>> {
        // skip blank lines between records
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                self.bump(c);
            } else {
                break;
            }
        }
        self.peek()?;

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;

        while let Some(c) = self.peek() {
            if quoted {
                if c == '"' {
                    self.bump(c);
                    if self.peek() == Some('"') {
                        field.push('"');
                        self.bump('"');
                    } else {
                        quoted = false;
                    }
                } else {
                    field.push(c);
                    self.bump(c);
                }
                continue;
            }
            match c {
                '"' if field.is_empty() => {
                    quoted = true;
                    self.bump(c);
                }
                ',' => {
                    fields.push(std::mem::take(&mut field));
                    self.bump(c);
                }
                '\r' => {
                    self.bump(c);
                    if self.peek() == Some('\n') {
                        self.bump('\n');
                    }
                    fields.push(field);
                    return Some(fields);
                }
                '\n' => {
                    self.bump(c);
                    fields.push(field);
                    return Some(fields);
                }
                _ => {
                    field.push(c);
                    self.bump(c);
                }
            }
        }
        fields.push(field);
        Some(fields)
    }
}
