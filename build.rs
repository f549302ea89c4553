fn main() {
    // Let Tauri's build steps run as usual.
    tauri_build::build();
}
