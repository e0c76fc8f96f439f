use glib_build_tools::compile_resources;

fn main() {
    let version = env!("CARGO_PKG_VERSION").to_string();

    println!("cargo:rustc-env=APP_VERSION={}", version);

    // Compile the resources
    compile_resources(
        &["resources"],
        "resources/resources.xml",
        "compiled.gresource",
    );

    // Tell cargo to rerun if resources change
    println!("cargo:rerun-if-changed=resources");
}
