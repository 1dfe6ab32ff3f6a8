//! 文件读取与下载

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::http::FileUpload;
use crate::error::{ClientError, ClientResult};

/// 把用户选择的文件整体读入内存
pub async fn read_file(file: &web_sys::File) -> ClientResult<FileUpload> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ClientError::from(e).in_op_with("file.read", file.name()))?;

    Ok(FileUpload {
        name: file.name(),
        mime: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

pub(crate) fn bytes_to_blob(bytes: &[u8], mime: &str) -> ClientResult<Blob> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| ClientError::from(e).in_op("blob.new"))
}

/// 下载内容的去向
pub trait FileSink {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> ClientResult<()>;
}

/// 交给浏览器保存
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownload;

impl FileSink for BrowserDownload {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> ClientResult<()> {
        trigger_download(bytes, filename, mime)
    }
}

/// 通过临时 object URL 与隐藏链接触发浏览器下载
fn trigger_download(bytes: &[u8], filename: &str, mime: &str) -> ClientResult<()> {
    let blob = bytes_to_blob(bytes, mime)?;

    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| ClientError::from(e).in_op("download.object_url"))?;

    let result = click_link(&url, filename);
    // 无论点击是否成功都释放 URL
    let _ = Url::revoke_object_url(&url);
    result
}

fn click_link(url: &str, filename: &str) -> ClientResult<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ClientError::browser("无法获取 document 对象"))?;
    let body = document
        .body()
        .ok_or_else(|| ClientError::browser("无法获取 document.body"))?;

    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| ClientError::from(e).in_op("download.link"))?
        .dyn_into()
        .map_err(|_| ClientError::browser("<a> 元素类型转换失败"))?;
    link.set_href(url);
    link.set_download(filename);

    body.append_child(&link)
        .map_err(|e| ClientError::from(e).in_op("download.link"))?;
    link.click();
    link.remove();
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// 记录保存过的文件名与大小
    #[derive(Default)]
    pub struct MockFileSink {
        pub saved: RefCell<Vec<(String, usize)>>,
    }

    impl FileSink for MockFileSink {
        fn save(&self, bytes: &[u8], filename: &str, _mime: &str) -> ClientResult<()> {
            self.saved
                .borrow_mut()
                .push((filename.to_string(), bytes.len()));
            Ok(())
        }
    }
}
