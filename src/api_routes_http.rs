use actix_web::{guard, web};
use comflex_api::{
  community::{
    add_mod::add_mod_to_community,
    dismiss::dismiss_member,
    join::join_community,
    leave::leave_community,
    transfer::transfer_community,
  },
  local_user::{login::login, logout::logout},
  post_type::{
    create::create_post_type,
    delete::delete_post_type,
    field::{add_post_type_field, remove_post_type_field},
    form::get_posting_form,
    list::list_post_types,
  },
  posting::like::{dislike_posting, like_posting},
  site::search::{advanced_search, search},
};
use comflex_api_crud::{
  community::{
    create::create_community,
    delete::delete_community,
    list::{list_communities, my_communities},
    read::get_community,
    update::update_community,
  },
  posting::{
    create::create_posting,
    delete::delete_posting,
    list::list_postings,
    read::get_posting,
    update::update_posting,
  },
  user::create::register,
};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Search
      .service(
        web::scope("/search")
          .route("", web::get().to(search))
          .route("/advanced", web::get().to(advanced_search)),
      )
      // Community
      .service(
        web::resource("/community")
          .guard(guard::Post())
          .route(web::post().to(create_community)),
      )
      .service(
        web::scope("/community")
          .route("", web::get().to(get_community))
          .route("", web::put().to(update_community))
          .route("/list", web::get().to(list_communities))
          .route("/mine", web::get().to(my_communities))
          .route("/delete", web::post().to(delete_community))
          .route("/join", web::post().to(join_community))
          .route("/leave", web::post().to(leave_community))
          // Owner and moderator actions
          .route("/mod", web::post().to(add_mod_to_community))
          .route("/dismiss", web::post().to(dismiss_member))
          .route("/transfer", web::post().to(transfer_community)),
      )
      // Post type
      .service(
        web::scope("/post_type")
          .route("", web::post().to(create_post_type))
          .route("/list", web::get().to(list_post_types))
          .route("/form", web::get().to(get_posting_form))
          .route("/delete", web::post().to(delete_post_type))
          .route("/field", web::post().to(add_post_type_field))
          .route("/field/delete", web::post().to(remove_post_type_field)),
      )
      // Posting
      .service(
        web::scope("/posting")
          .route("", web::get().to(get_posting))
          .route("", web::post().to(create_posting))
          .route("", web::put().to(update_posting))
          .route("/list", web::get().to(list_postings))
          .route("/delete", web::post().to(delete_posting))
          .route("/like", web::post().to(like_posting))
          .route("/dislike", web::post().to(dislike_posting)),
      )
      // User
      .service(
        web::scope("/user")
          .route("/register", web::post().to(register))
          .route("/login", web::post().to(login))
          .route("/logout", web::post().to(logout)),
      ),
  );
}
