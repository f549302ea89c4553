fn main() {
    cslauncher_lib::run()
}
