use axum::response::Html;

use crate::utils::IMAGE_FIELD;

/// Upload form served at `/`
pub async fn upload_page() -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>Загрузка изображения</title>
</head>
<body>
<h1>Загрузка изображения</h1>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="{field}" accept=".jpeg,.jpg,.png,.bmp">
<button type="submit">Загрузить</button>
</form>
</body>
</html>
"#,
        field = IMAGE_FIELD
    ))
}
