use anyhow::anyhow;
use tasktab_core::KeyValueStorage;
use wasm_bindgen::JsValue;

/// `window.localStorage`.
///
/// A missing window or disabled
/// storage reads as empty and fails on
/// write.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
  fn raw(
    &self
  ) -> anyhow::Result<web_sys::Storage>
  {
    web_sys::window()
      .ok_or_else(|| {
        anyhow!("no browser window")
      })?
      .local_storage()
      .map_err(js_error)?
      .ok_or_else(|| {
        anyhow!(
          "local storage is disabled"
        )
      })
  }
}

impl KeyValueStorage for LocalStorage {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    match self.raw() {
      | Ok(storage) => storage
        .get_item(key)
        .map_err(js_error),
      | Err(error) => {
        tracing::warn!(
          %error,
          "local storage unavailable"
        );
        Ok(None)
      }
    }
  }

  fn set_item(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .raw()?
      .set_item(key, value)
      .map_err(js_error)
  }

  fn remove_item(
    &self,
    key: &str
  ) -> anyhow::Result<()> {
    self
      .raw()?
      .remove_item(key)
      .map_err(js_error)
  }
}

fn js_error(
  value: JsValue
) -> anyhow::Error {
  anyhow!("local storage error: {value:?}")
}
