fn main() {
    quen::cli::run();
}
