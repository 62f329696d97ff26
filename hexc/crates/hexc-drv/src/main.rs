use std::process;

fn main() {
    match hexc_drv::run() {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {:#}", error);
            process::exit(2);
        }
    }
}
