use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Writes `prompt`, reads one line and returns it trimmed of surrounding whitespace
pub async fn prompt_line<R, W>(
    prompt: &str,
    reader: &mut R,
    writer: &mut W,
) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(prompt.as_bytes()).await?;
    writer.flush().await?;

    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_prompt_line_trims_input() {
        let mut input = Cursor::new(b"  https://en.wikipedia.org/wiki/Rust \nsecond\n".to_vec());
        let mut output = Vec::new();

        let first = prompt_line("Start page: ", &mut input, &mut output).await.unwrap();
        let second = prompt_line("Target page: ", &mut input, &mut output).await.unwrap();

        assert_eq!(first, "https://en.wikipedia.org/wiki/Rust");
        assert_eq!(second, "second");
        assert_eq!(String::from_utf8(output).unwrap(), "Start page: Target page: ");
    }

    #[tokio::test]
    async fn test_prompt_line_at_end_of_input() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let line = prompt_line("Start page: ", &mut input, &mut output).await.unwrap();
        assert_eq!(line, "");
    }
}
