//! [`Console`] line sources for a [`Session`].
//!
//! [`Session`]: crate::Session

use std::{
    future::Future,
    io::{self, BufRead},
};

use tokio::sync::mpsc;

/// What a [`Console`] read produced.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Input {
    /// A line of input, without the line ending.
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// No more input will arrive.
    Closed,
}

/// A source of input lines.
pub trait Console {
    /// Wait for the next line.
    fn read_line(&mut self) -> impl Future<Output = io::Result<Input>>;

    /// Resolve when the user asks to stop while no line is being read, for
    /// example during generation. The default never resolves.
    fn interrupted(&mut self) -> impl Future<Output = io::Result<()>> {
        std::future::pending()
    }
}

/// Reads lines from the process's standard input (or any other reader) and
/// watches for Ctrl-C.
///
/// Input is read on a dedicated thread so that a pending read never keeps the
/// process alive after the session ends.
pub struct Stdin {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl Stdin {
    /// Start reading standard input.
    pub fn spawn() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Start reading lines from `reader`.
    ///
    /// A line that is not valid UTF-8 is reported as an
    /// [`io::ErrorKind::InvalidData`] error and reading carries on with the
    /// next line. Other errors end the input.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, lines) = mpsc::channel(1);
        std::thread::spawn(move || pump(reader, tx));

        Self { lines }
    }
}

/// Send lines from `reader` until it ends, fails for good or nobody listens.
fn pump<R: BufRead>(mut reader: R, tx: mpsc::Sender<io::Result<String>>) {
    let mut buf = String::new();
    loop {
        buf.clear();
        let line = match reader.read_line(&mut buf) {
            Ok(0) => break,
            Ok(_) => Ok(strip_line_ending(&buf).to_string()),
            Err(e) => Err(e),
        };

        // `read_line` has consumed the offending bytes already.
        let keep_going = match &line {
            Ok(_) => true,
            Err(e) => e.kind() == io::ErrorKind::InvalidData,
        };

        if tx.blocking_send(line).is_err() || !keep_going {
            break;
        }
    }

    #[cfg(feature = "log")]
    log::debug!("Input reader stopped");
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

impl Console for Stdin {
    async fn read_line(&mut self) -> io::Result<Input> {
        tokio::select! {
            line = self.lines.recv() => match line {
                Some(line) => line.map(Input::Line),
                None => Ok(Input::Closed),
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                Ok(Input::Interrupted)
            }
        }
    }

    async fn interrupted(&mut self) -> io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("eggs\n"), "eggs");
        assert_eq!(strip_line_ending("eggs\r\n"), "eggs");
        assert_eq!(strip_line_ending("eggs"), "eggs");
        assert_eq!(strip_line_ending("\n"), "");
    }

    #[tokio::test]
    async fn test_reader_lines_then_closed() {
        let mut console = Stdin::from_reader(Cursor::new("eggs\r\n\nbread"));

        assert_eq!(console.read_line().await.unwrap(), Input::Line("eggs".into()));
        assert_eq!(console.read_line().await.unwrap(), Input::Line("".into()));
        assert_eq!(console.read_line().await.unwrap(), Input::Line("bread".into()));
        assert_eq!(console.read_line().await.unwrap(), Input::Closed);
        assert_eq!(console.read_line().await.unwrap(), Input::Closed);
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_end_input() {
        let input: &[u8] = b"eggs\n\xff\xfe\nbread\n";
        let mut console = Stdin::from_reader(Cursor::new(input.to_vec()));

        assert_eq!(console.read_line().await.unwrap(), Input::Line("eggs".into()));
        let err = console.read_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(console.read_line().await.unwrap(), Input::Line("bread".into()));
        assert_eq!(console.read_line().await.unwrap(), Input::Closed);
    }

    /// Reader that fails with a non-recoverable error after its data.
    struct Broken(Cursor<&'static [u8]>);

    impl io::Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl BufRead for Broken {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.0.position() as usize == self.0.get_ref().len() {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            self.0.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.0.consume(amt)
        }
    }

    #[tokio::test]
    async fn test_fatal_error_ends_input() {
        let mut console = Stdin::from_reader(Broken(Cursor::new(&b"eggs\n"[..])));

        assert_eq!(console.read_line().await.unwrap(), Input::Line("eggs".into()));
        let err = console.read_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(console.read_line().await.unwrap(), Input::Closed);
    }
}
