use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Line-oriented prompt over any async reader/writer pair.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Print `prompt` and read one trimmed line. End of input is an error.
    pub async fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.write_all(b" ").await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim().to_owned())
    }

    /// Yes/no question; `o`, `oui`, `y` and `yes` mean yes.
    pub async fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{prompt} (o/n)")).await?;
        Ok(matches!(
            answer.to_lowercase().as_str(),
            "o" | "oui" | "y" | "yes"
        ))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
