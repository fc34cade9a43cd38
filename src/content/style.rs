/// Styles injected into the host page. Classes are prefixed `ytp-` to stay
/// clear of the site's own names.
pub const STYLESHEET_ID: &str = "ytp-pinner-style";

pub const STYLESHEET: &str = r#"
#yt-pinned-row { margin: 18px 0; padding: 0 16px; color: var(--ytd-masthead-button-color, #fff); }
#yt-pinned-row h2 { font-size: 18px; margin: 8px 0; }
.ytp-pinned-list { display: flex; gap: 14px; flex-wrap: wrap; align-items: flex-start; }
.ytp-pinned-card { position: relative; width: 220px; margin-bottom: 20px; }
.ytp-pinned-card a { text-decoration: none; color: inherit; display: block; }
.ytp-pinned-card img { display: block; border-radius: 6px; width: 100%; }
.ytp-pinned-title { font-size: 13px; margin-top: 6px; line-height: 1.2; max-height: 2.4em; overflow: hidden; text-overflow: ellipsis; }
.ytp-unpin-btn, .ytp-homepage-pin-btn {
  position: absolute; top: 8px; right: 8px; z-index: 10;
  background: rgba(0, 0, 0, 0.7); border: none; border-radius: 50%;
  cursor: pointer; color: #fff;
  display: flex; align-items: center; justify-content: center;
  transition: background 0.2s ease, transform 0.2s ease;
}
.ytp-unpin-btn { width: 24px; height: 24px; font-size: 12px; }
.ytp-homepage-pin-btn { width: 28px; height: 28px; font-size: 14px; animation: ytp-pop-in 0.2s ease; }
.ytp-unpin-btn:hover { background: rgba(255, 0, 0, 0.8); }
.ytp-homepage-pin-btn:hover { background: rgba(255, 0, 0, 0.8); transform: scale(1.1); }
@keyframes ytp-pop-in { from { opacity: 0; transform: scale(0.8); } to { opacity: 1; transform: scale(1); } }
#ytp-pin-button {
  margin-left: 8px; padding: 8px 16px; height: 36px;
  font-size: 14px; font-weight: 500; font-family: "Roboto", "Arial", sans-serif;
  cursor: pointer; border-radius: 18px;
  border: 1px solid rgba(255, 255, 255, 0.1); background: rgba(255, 255, 255, 0.1); color: #fff;
  display: inline-flex; align-items: center; gap: 6px;
  transition: background 0.1s ease;
}
#ytp-pin-button:hover { background: rgba(255, 255, 255, 0.2); }
#ytp-pin-msg { position: fixed; right: 16px; top: 80px; z-index: 999999; background: #111; color: #fff; padding: 8px 12px; border-radius: 6px; opacity: 0.95; }
"#;
