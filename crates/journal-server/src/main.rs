use std::process;

fn main() {
    match journal_server::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("journal error: {err:#}");
            process::exit(1);
        }
    }
}
