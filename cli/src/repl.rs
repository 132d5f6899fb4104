use std::io::{BufRead, Write};

/// Prompt and read one line from stdin. Fails at end of input.
pub fn readline() -> Result<String, String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "lmeter> ").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())?;

    let mut buffer = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Err("end of input".to_string());
    }
    Ok(buffer)
}
