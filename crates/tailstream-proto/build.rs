// ABOUTME: Build script for generating Rust code from tailstream.proto.
// ABOUTME: Uses tonic-build to compile protobuf definitions into Rust types.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point prost/tonic-build at a bundled protoc so the build does not
    // depend on a system-installed protobuf compiler.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc);
        }
    }

    // The server side is generated too; the integration tests stand up an
    // in-process LogStreamer to drive the client against.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto-src/tailstream.proto"], &["proto-src"])?;

    println!("cargo:rerun-if-changed=proto-src/tailstream.proto");

    Ok(())
}
