pub mod data_uri;

use crate::error::{MoodboardError, Result};
use moodboard_common::MoodcheckRequest;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 1回に送れる画像数
pub const MAX_IMAGES: usize = 5;
/// 1枚あたりの上限（デコード後）
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// プロンプトの最大文字数
pub const MAX_PROMPT_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ImageInput {
    /// 表示用の名前（ファイル名、またはData URIの番号）
    pub source: String,
    pub mime_type: String,
    pub data_uri: String,
    pub size_bytes: usize,
}

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

/// 拡張子からMIMEタイプ（大文字小文字を区別しない）
fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
}

/// フォルダ直下の画像ファイルを列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(MoodboardError::FileNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && mime_for_path(path).is_some())
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// 画像ファイルを読み込んでData URIにする
pub fn load_image(path: &Path) -> Result<ImageInput> {
    let mime_type = mime_for_path(path).ok_or_else(|| {
        MoodboardError::InvalidInput(format!(
            "未対応の画像形式です: {}（JPEG, PNG, WEBPのみ）",
            path.display()
        ))
    })?;

    let bytes = std::fs::read(path)?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(MoodboardError::InvalidInput(format!(
            "{}: 画像サイズが上限（{}MB）を超えています",
            path.display(),
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImageInput {
        source,
        mime_type: mime_type.to_string(),
        data_uri: data_uri::encode(mime_type, &bytes),
        size_bytes: bytes.len(),
    })
}

/// 読み込み前の入力
enum Pending {
    DataUri { index: usize, uri: String },
    File(PathBuf),
}

/// 入力（ファイル・フォルダ・Data URI）を画像リストにまとめる
///
/// 枚数は読み込み前に確認する。
pub fn collect_images(inputs: &[String]) -> Result<Vec<ImageInput>> {
    let mut pending = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        if input.starts_with("data:") {
            pending.push(Pending::DataUri { index, uri: input.clone() });
            continue;
        }

        let path = Path::new(input);
        if path.is_dir() {
            pending.extend(scan_folder(path)?.into_iter().map(Pending::File));
        } else if path.is_file() {
            pending.push(Pending::File(path.to_path_buf()));
        } else {
            return Err(MoodboardError::FileNotFound(input.clone()));
        }
    }

    if pending.len() > MAX_IMAGES {
        return Err(MoodboardError::InvalidInput(format!(
            "画像は最大{}枚までです（{}枚指定）",
            MAX_IMAGES,
            pending.len()
        )));
    }

    let images = pending
        .into_iter()
        .map(|item| match item {
            Pending::DataUri { index, uri } => {
                let (mime_type, size_bytes) = data_uri::validate(&uri)?;
                Ok(ImageInput {
                    source: format!("data-uri #{}", index + 1),
                    mime_type,
                    data_uri: uri,
                    size_bytes,
                })
            }
            Pending::File(path) => load_image(&path),
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(count = images.len(), "images collected");
    Ok(images)
}

/// 送信前のチェック（画像かプロンプトのどちらかが必要）
pub fn validate_submission(images: &[ImageInput], prompt: &str) -> Result<()> {
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(MoodboardError::InvalidInput(format!(
            "プロンプトは{}文字以内にしてください",
            MAX_PROMPT_CHARS
        )));
    }

    if images.is_empty() && prompt.trim().is_empty() {
        return Err(MoodboardError::InvalidInput(
            "イメージを説明するか、画像を1枚以上指定してください".into(),
        ));
    }

    Ok(())
}

/// 検証してリクエストを組み立てる
pub fn moodcheck_request(images: &[ImageInput], prompt: &str) -> Result<MoodcheckRequest> {
    validate_submission(images, prompt)?;
    Ok(MoodcheckRequest {
        images: images.iter().map(|i| i.data_uri.clone()).collect(),
        prompt: prompt.trim().to_string(),
        max_products: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("JPEG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("webp"), Some("image/webp"));
        assert_eq!(mime_for_extension("gif"), None);
        assert_eq!(mime_for_extension("txt"), None);
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(MoodboardError::FileNotFound(_))));
    }

    #[test]
    fn test_scan_folder_sorted_images_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.webp"), b"c").unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();
        fs::write(dir.path().join("b.PNG"), b"b").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<String> = result
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.webp"]);
    }

    #[test]
    fn test_collect_too_many_images() {
        let dir = tempdir().unwrap();
        for i in 0..6 {
            fs::write(dir.path().join(format!("{}.jpg", i)), b"x").unwrap();
        }

        let inputs = vec![dir.path().display().to_string()];
        let err = collect_images(&inputs).unwrap_err();
        assert!(matches!(err, MoodboardError::InvalidInput(_)));
    }

    #[test]
    fn test_collect_counts_before_reading() {
        let dir = tempdir().unwrap();
        // 先頭のファイルはサイズ超過。枚数エラーが先に出る
        fs::write(dir.path().join("0.jpg"), vec![0u8; MAX_IMAGE_BYTES + 1]).unwrap();
        for i in 1..6 {
            fs::write(dir.path().join(format!("{}.jpg", i)), b"x").unwrap();
        }

        let inputs = vec![dir.path().display().to_string()];
        let err = collect_images(&inputs).unwrap_err();
        assert!(err.to_string().contains("最大5枚"), "{}", err);
    }

    #[test]
    fn test_collect_mixes_files_and_data_uris() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("look.png");
        fs::write(&file, b"png bytes").unwrap();

        let inputs = vec![
            file.display().to_string(),
            data_uri::encode("image/jpeg", b"jpeg bytes"),
        ];
        let images = collect_images(&inputs).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].source, "look.png");
        assert_eq!(images[0].mime_type, "image/png");
        assert_eq!(images[1].source, "data-uri #2");
        assert_eq!(images[1].size_bytes, 10);
    }

    #[test]
    fn test_validate_submission() {
        assert!(validate_submission(&[], "y2k streetwear").is_ok());
        assert!(validate_submission(&[], "   ").is_err());
        assert!(validate_submission(&[], &"a".repeat(MAX_PROMPT_CHARS + 1)).is_err());
        assert!(validate_submission(&[], &"あ".repeat(MAX_PROMPT_CHARS)).is_ok());
    }

    #[test]
    fn test_moodcheck_request_trims_prompt() {
        let request = moodcheck_request(&[], "  boho summer  ").unwrap();
        assert_eq!(request.prompt, "boho summer");
        assert!(request.images.is_empty());
        assert_eq!(request.max_products, None);
    }
}
