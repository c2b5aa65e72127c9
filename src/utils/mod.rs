pub mod ip;
pub mod url_validator;

/// 链接 id 长度（UUID v4 前 8 位十六进制）
pub const LINK_ID_LEN: usize = 8;

/// 生成新的链接 id：随机 UUID v4 的前 8 个小写十六进制字符
pub fn generate_link_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(LINK_ID_LEN);
    id
}

/// 检查字符串是否符合链接 id 的形状
pub fn is_valid_link_id(id: &str) -> bool {
    id.len() == LINK_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
