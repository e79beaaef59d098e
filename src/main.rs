use screenwright::{generate_fdx, generate_html, generate_pdf, parse, HtmlOptions};
use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <fountain_file> [output.html|output.pdf|output.fdx|output.json]",
            args[0]
        );
        process::exit(2);
    }

    let content = match fs::read_to_string(&args[1]) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("failed to read {}: {}", args[1], e);
            process::exit(1);
        }
    };

    let screenplay = parse(&content);

    let result = match args.get(2) {
        // No output file: HTML fragment on stdout.
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            generate_html(&screenplay, &mut out, &HtmlOptions { bare: true })
                .map_err(|e| e.to_string())
        }
        Some(path) => {
            let format = Path::new(path)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("html")
                .to_lowercase();
            let file = match fs::File::create(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("failed to create {}: {}", path, e);
                    process::exit(1);
                }
            };
            let mut out = BufWriter::new(file);
            let written = match format.as_str() {
                "pdf" => generate_pdf(&screenplay, &mut out).map_err(|e| e.to_string()),
                "fdx" | "xml" => generate_fdx(&screenplay, &mut out).map_err(|e| e.to_string()),
                "json" => serde_json::to_writer_pretty(&mut out, &screenplay)
                    .map_err(|e| e.to_string()),
                _ => generate_html(&screenplay, &mut out, &HtmlOptions::default())
                    .map_err(|e| e.to_string()),
            };
            written.and_then(|_| out.flush().map_err(|e| e.to_string()))
        }
    };

    if let Err(message) = result {
        eprintln!("export failed: {}", message);
        process::exit(1);
    }
}
