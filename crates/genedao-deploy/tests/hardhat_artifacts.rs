//! Tests for loading contracts from a Hardhat `artifacts/` tree.

use std::{fs, path::Path};

use genedao_deploy::{ArtifactError, ArtifactSource, HardhatArtifacts};
use serde_json::json;
use tempfile::TempDir;

fn write_artifact(root: &Path, source: &str, name: &str, bytecode: &str) {
    let dir = root.join("contracts").join(source);
    fs::create_dir_all(&dir).unwrap();
    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": name,
        "sourceName": format!("contracts/{source}"),
        "abi": [],
        "bytecode": bytecode,
        "deployedBytecode": "0x",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(dir.join(format!("{name}.json")), artifact.to_string()).unwrap();
    fs::write(dir.join(format!("{name}.dbg.json")), r#"{"buildInfo":"../../build-info/x.json"}"#)
        .unwrap();
}

#[test]
fn test_loads_nested_artifacts() {
    let root = TempDir::new().unwrap();
    write_artifact(root.path(), "GeneNFT.sol", "GeneNFT", "0x608060405234801561001057600080fd5b50");
    write_artifact(root.path(), "Controller.sol", "Controller", "0x6080");

    let artifacts = HardhatArtifacts::new(root.path());
    let nft = artifacts.load("GeneNFT").unwrap();
    assert_eq!(nft.name, "GeneNFT");
    assert_eq!(nft.bytecode.len(), 18);
    assert_eq!(artifacts.load("Controller").unwrap().bytecode.as_ref(), &[0x60, 0x80]);
}

#[test]
fn test_build_info_is_ignored() {
    let root = TempDir::new().unwrap();
    write_artifact(root.path(), "GeneNFT.sol", "GeneNFT", "0x6080");
    let build_info = root.path().join("build-info");
    fs::create_dir_all(&build_info).unwrap();
    fs::write(build_info.join("GeneNFT.json"), "{}").unwrap();

    assert!(HardhatArtifacts::new(root.path()).load("GeneNFT").is_ok());
}

#[test]
fn test_missing_and_ambiguous_artifacts() {
    let root = TempDir::new().unwrap();
    write_artifact(root.path(), "A.sol", "Token", "0x6080");
    write_artifact(root.path(), "B.sol", "Token", "0x6080");
    let artifacts = HardhatArtifacts::new(root.path());

    assert!(matches!(artifacts.load("Controller"), Err(ArtifactError::NotFound(_))));
    assert!(matches!(artifacts.load("Token"), Err(ArtifactError::Ambiguous { .. })));
}

#[test]
fn test_rejects_undeployable_bytecode() {
    let root = TempDir::new().unwrap();
    write_artifact(root.path(), "IOwnable.sol", "IOwnable", "0x");
    fs::write(root.path().join("Broken.json"), "not json").unwrap();
    let artifacts = HardhatArtifacts::new(root.path());

    assert!(matches!(artifacts.load("IOwnable"), Err(ArtifactError::InvalidBytecode { .. })));
    assert!(matches!(artifacts.load("Broken"), Err(ArtifactError::Parse { .. })));
}

#[test]
fn test_missing_root_is_read_error() {
    let artifacts = HardhatArtifacts::new("/nonexistent/artifacts");
    assert!(matches!(artifacts.load("GeneNFT"), Err(ArtifactError::Read { .. })));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_are_not_followed() {
    let root = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write_artifact(root.path(), "GeneNFT.sol", "GeneNFT", "0x6080");
    write_artifact(outside.path(), "GeneNFT.sol", "GeneNFT", "0x6080");
    write_artifact(outside.path(), "Controller.sol", "Controller", "0x6080");
    std::os::unix::fs::symlink(outside.path(), root.path().join("linked")).unwrap();

    let artifacts = HardhatArtifacts::new(root.path());
    // The linked copy would otherwise make the name ambiguous
    assert!(artifacts.load("GeneNFT").is_ok());
    assert!(matches!(artifacts.load("Controller"), Err(ArtifactError::NotFound(_))));
}

#[test]
fn test_build_info_below_the_root_only() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("build-info");
    write_artifact(&root, "GeneNFT.sol", "GeneNFT", "0x6080");

    assert!(HardhatArtifacts::new(&root).load("GeneNFT").is_ok());
}
