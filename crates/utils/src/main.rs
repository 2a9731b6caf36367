use comflex_utils::settings::structs::Settings;
use doku::json::{AutoComments, CommentsStyle, Formatting, ObjectsStyle};

/// Prints the documented default configuration, used to regenerate `config/defaults.hjson`.
fn main() {
  let fmt = Formatting {
    auto_comments: AutoComments::none(),
    comments_style: CommentsStyle {
      separator: "#".to_owned(),
    },
    objects_style: ObjectsStyle {
      surround_keys_with_quotes: false,
      use_comma_as_separator: false,
    },
    ..Default::default()
  };
  println!("{}", doku::to_json_fmt_val(&fmt, &Settings::default()));
}
