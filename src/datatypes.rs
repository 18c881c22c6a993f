use encoding_rs::Encoding;

// 无 BOM 时依次尝试的编码
const FALLBACK_ENCODINGS: &[&str] = &["utf-8", "windows-1252"];

/// 解码后的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub content: String,
    pub encoding: String,
}

impl DecodedText {
    /// 解码文件字节
    ///
    /// 优先按 BOM 判断编码（UTF-8/UTF-16LE/UTF-16BE），否则依次尝试候选编码，
    /// 全部失败时按 UTF-8 有损解码。
    pub fn decode(data: &[u8]) -> Self {
        if let Some((encoding, bom_length)) = Encoding::for_bom(data) {
            let (decoded, _) = encoding.decode_without_bom_handling(&data[bom_length..]);
            return DecodedText {
                content: decoded.into_owned(),
                encoding: encoding.name().to_lowercase(),
            };
        }

        for encoding_name in FALLBACK_ENCODINGS {
            if let Some(encoding) = Encoding::for_label(encoding_name.as_bytes()) {
                let (decoded, had_errors) = encoding.decode_without_bom_handling(data);
                if !had_errors {
                    return DecodedText {
                        content: decoded.into_owned(),
                        encoding: encoding_name.to_string(),
                    };
                }
            }
        }

        // 回退到UTF-8，忽略错误
        DecodedText {
            content: String::from_utf8_lossy(data).into_owned(),
            encoding: "utf-8".to_string(),
        }
    }
}
