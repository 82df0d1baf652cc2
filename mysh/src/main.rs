use std::process::ExitCode;

fn main() -> ExitCode {
    mysh::lib_main()
}
