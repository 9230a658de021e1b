fn main() -> std::process::ExitCode {
    dockercraft_lib::run()
}
