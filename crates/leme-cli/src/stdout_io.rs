use std::io::{self, Write};

/// Writes `text` to stdout, ending it with a newline when it lacks one.
/// A closed pipe (`leme history list | head`) is not an error.
pub fn write_stdout(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_block(&mut stdout, text)
}

fn write_block(writer: &mut impl Write, text: &str) -> io::Result<()> {
    let result = writer.write_all(text.as_bytes()).and_then(|()| {
        if text.ends_with('\n') {
            Ok(())
        } else {
            writer.write_all(b"\n")
        }
    });
    match result.and_then(|()| writer.flush()) {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::write_block;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn blocks_end_with_exactly_one_newline() {
        let mut buffer = Vec::new();
        assert!(write_block(&mut buffer, "Health score: 72/100").is_ok());
        assert!(write_block(&mut buffer, "done\n").is_ok());
        assert_eq!(String::from_utf8_lossy(&buffer), "Health score: 72/100\ndone\n");
    }

    #[test]
    fn closed_pipe_is_ignored() {
        assert!(write_block(&mut ClosedPipe, "ignored").is_ok());
    }
}
